//! The engine aggregate and session flow.
//!
//! One [`Engine`] is one session. Every mutation happens inside a
//! `&mut self` turn; the host serializes player commands and fired timers
//! onto it, which is the entire concurrency story.

mod adversary;
mod command;
mod dialogue;
mod influence;
mod items;
mod phase;

pub use command::normalize;
pub use dialogue::{AUTO_ADVANCE_DELAY, VICTORY_DELAY};

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

use grid_rules::{
    ContentCatalog, GameState, GameView, LogLine, LogStyle, MusicTrack, SoundCue, StatePatch,
    StateStore, PENDING_NAME,
};

use crate::scheduler::{DeferredAction, Scheduled};

/// Requests the core raises to its host shell (presentation, persistence
/// transport, idle handling). The core only signals; the host acts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostRequest {
    /// The idle screensaver was explicitly triggered.
    Screensaver,
    /// The player asked to load; the host must produce a save document.
    PickSaveFile,
    /// A serialized save document ready to be written out.
    DeliverSave(String),
}

/// The game state transition engine.
pub struct Engine {
    pub(crate) store: StateStore,
    pub(crate) catalog: ContentCatalog,
    pub(crate) rng: StdRng,
    pub(crate) sounds: Vec<SoundCue>,
    pub(crate) requests: Vec<HostRequest>,
    pub(crate) timers: Vec<Scheduled>,
    /// Bumped on reset and load; timers from an older epoch never fire.
    pub(crate) epoch: u64,
    pub(crate) autosave: Option<String>,
}

impl Engine {
    /// Create an engine over `catalog` with an entropy-seeded RNG.
    pub fn new(catalog: ContentCatalog) -> Self {
        Self::with_rng(catalog, StdRng::from_entropy())
    }

    /// Create an engine with a caller-provided RNG (fixed seeds in tests).
    pub fn with_rng(catalog: ContentCatalog, rng: StdRng) -> Self {
        let reload_line = catalog.strings.get("system.tool_reloaded");
        Self {
            store: StateStore::new(reload_line),
            catalog,
            rng,
            sounds: Vec::new(),
            requests: Vec::new(),
            timers: Vec::new(),
            epoch: 0,
            autosave: None,
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> &GameState {
        self.store.state()
    }

    /// Everything logged to the terminal so far.
    pub fn log(&self) -> &[LogLine] {
        self.store.log()
    }

    /// The catalog this session plays from.
    pub fn catalog(&self) -> &ContentCatalog {
        &self.catalog
    }

    /// Drain sound cues queued since the last call.
    pub fn take_sounds(&mut self) -> Vec<SoundCue> {
        std::mem::take(&mut self.sounds)
    }

    /// Drain host requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<HostRequest> {
        std::mem::take(&mut self.requests)
    }

    /// Drain deferred actions for the host's timer loop.
    pub fn take_scheduled(&mut self) -> Vec<Scheduled> {
        std::mem::take(&mut self.timers)
    }

    pub(crate) fn apply(&mut self, patch: StatePatch) {
        self.store.apply(patch);
    }

    pub(crate) fn play(&mut self, cue: SoundCue) {
        self.sounds.push(cue);
    }

    pub(crate) fn schedule(&mut self, delay: Duration, action: DeferredAction) {
        self.timers.push(Scheduled {
            delay,
            epoch: self.epoch,
            action,
        });
    }

    // --- session flow ---

    /// Loading finished; show the title screen.
    pub fn initialize(&mut self) {
        self.apply(StatePatch {
            view: Some(GameView::Title),
            ..Default::default()
        });
    }

    /// Any key on the title screen drops into the menu.
    pub fn advance_from_title(&mut self) {
        self.apply(StatePatch {
            view: Some(GameView::Menu),
            ..Default::default()
        });
    }

    /// The new-game action: reset everything and roll the opening.
    pub fn start_opening(&mut self) {
        self.epoch += 1;
        self.store.reset();
        self.apply(StatePatch {
            view: Some(GameView::Opening),
            ..Default::default()
        });
        self.play(SoundCue::Music(MusicTrack::Opening));
    }

    /// The opening sequence handed control to the terminal.
    pub fn begin_gameplay(&mut self) {
        self.play(SoundCue::StopMusic);
        self.apply(StatePatch {
            view: Some(GameView::Gameplay),
            player_name: Some(PENDING_NAME.to_string()),
            ..Default::default()
        });
        self.store.clear_log();
        let line = self.catalog.strings.get("system.new_operation_starting");
        self.store.push_line(line, LogStyle::System);
    }

    /// The exit-to-menu action: abandon the run.
    pub fn reset_game(&mut self) {
        self.epoch += 1;
        self.store.reset();
        self.store.clear_log();
        self.apply(StatePatch {
            view: Some(GameView::Menu),
            ..Default::default()
        });
    }

    /// Open the settings view, remembering where it was opened from.
    pub fn open_settings(&mut self) {
        let previous = self.state().view;
        self.apply(StatePatch {
            view: Some(GameView::Settings),
            previous_view: Some(Some(previous)),
            ..Default::default()
        });
    }

    /// Return from the settings view.
    pub fn close_settings(&mut self) {
        let target = self.state().previous_view.unwrap_or(GameView::Menu);
        self.apply(StatePatch {
            view: Some(target),
            previous_view: Some(None),
            ..Default::default()
        });
    }

    /// First gameplay input: capture the player's codename and boot the
    /// run - stamp the character pool, bring the opening roster online,
    /// and have the guide brief the player.
    pub(crate) fn set_player_name(&mut self, raw: &str) {
        let name = raw.trim().to_uppercase();
        if name.is_empty() {
            return;
        }

        let pool = self.catalog.instantiate_pool();
        self.apply(StatePatch {
            player_name: Some(name.clone()),
            all_characters_pool: Some(pool),
            ..Default::default()
        });
        self.store.push_line(format!("> {name}"), LogStyle::Player);

        self.activate_characters_for_phase();
        self.play(SoundCue::Music(MusicTrack::Urgent));

        let intro = self.catalog.intro_lines.clone();
        for line in intro {
            self.store.push_line(line, LogStyle::System);
        }

        let guide_id = self.catalog.config.guide_id.clone();
        let Some(guide) = self.state().active_characters.get(&guide_id).cloned() else {
            tracing::warn!(guide = %guide_id, "guide is not part of the opening roster");
            return;
        };
        let greeting = self.catalog.strings.format("intro.greeting", &[&name]);
        self.store.push_line(
            format!("[{}]: {}", guide_id.to_uppercase(), greeting),
            guide.log_style(),
        );
        self.start_dialogue(&guide_id);
    }
}
