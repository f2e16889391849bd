//! Canonical game state - the single mutable aggregate.

mod store;

pub use store::*;

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::characters::CharacterRecord;
use crate::dialogue::DialogueOption;

/// Sentinel player name until the codename prompt is answered.
pub const PENDING_NAME: &str = "PENDING";

/// Player influence at the start of a run.
pub const INITIAL_INFLUENCE: f32 = 70.0;

/// Top-level mode the session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameView {
    Loading,
    Title,
    Opening,
    Menu,
    Gameplay,
    Ending,
    Settings,
}

/// A two-turn interaction waiting for its free-text argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    pub item_id: String,
    pub step: PendingStep,
}

/// Steps of a pending interaction. Currently only target selection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingStep {
    AwaitingTarget,
}

/// The conversation currently holding the prompt, if any. While set, only
/// answer commands are accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveDialogue {
    pub character_id: String,
    pub options: Vec<DialogueOption>,
}

/// The complete game state.
///
/// Owned exclusively by the [`StateStore`] and replaced wholesale on every
/// mutation; no other component holds a live reference across a turn.
/// Character records in `active_characters` are deep copies stamped from
/// `all_characters_pool`, never shared with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub view: GameView,
    /// Monotonically non-decreasing during a playthrough.
    pub current_phase: u32,
    /// Player standing in [0, 100].
    pub player_influence: f32,
    /// Append-only until game reset.
    pub key_fragments: BTreeSet<String>,
    pub active_characters: BTreeMap<String, CharacterRecord>,
    pub all_characters_pool: BTreeMap<String, CharacterRecord>,
    /// Terminal latch; once set, only an explicit reset mutates state again.
    pub game_over: bool,
    pub active_dialogue: Option<ActiveDialogue>,
    pub player_name: String,
    /// Item id -> count held.
    pub inventory: BTreeMap<String, u32>,
    pub phase_objective_complete: bool,
    /// One-way latch flipped by the sage.
    pub final_phase_started: bool,
    pub pending_action: Option<PendingAction>,
    /// Single-use-per-phase tool latch, cleared on phase advance.
    pub sector_tool_used: bool,
    pub modulator_active: bool,
    pub firewall_active: bool,
    /// Where the settings view returns to.
    pub previous_view: Option<GameView>,
}

impl GameState {
    /// Pristine state at process start and after an explicit reset.
    pub fn initial() -> Self {
        Self {
            view: GameView::Loading,
            current_phase: 1,
            player_influence: INITIAL_INFLUENCE,
            key_fragments: BTreeSet::new(),
            active_characters: BTreeMap::new(),
            all_characters_pool: BTreeMap::new(),
            game_over: false,
            active_dialogue: None,
            player_name: String::new(),
            inventory: BTreeMap::new(),
            phase_objective_complete: false,
            final_phase_started: false,
            pending_action: None,
            sector_tool_used: false,
            modulator_active: false,
            firewall_active: false,
            previous_view: None,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

/// A shallow-merge update to the game state.
///
/// `None` fields keep their current value. The fields that are themselves
/// optional in [`GameState`] are doubly wrapped so a patch can explicitly
/// clear them.
#[derive(Debug, Clone, Default)]
pub struct StatePatch {
    pub view: Option<GameView>,
    pub current_phase: Option<u32>,
    pub player_influence: Option<f32>,
    pub key_fragments: Option<BTreeSet<String>>,
    pub active_characters: Option<BTreeMap<String, CharacterRecord>>,
    pub all_characters_pool: Option<BTreeMap<String, CharacterRecord>>,
    pub game_over: Option<bool>,
    pub active_dialogue: Option<Option<ActiveDialogue>>,
    pub player_name: Option<String>,
    pub inventory: Option<BTreeMap<String, u32>>,
    pub phase_objective_complete: Option<bool>,
    pub final_phase_started: Option<bool>,
    pub pending_action: Option<Option<PendingAction>>,
    pub sector_tool_used: Option<bool>,
    pub modulator_active: Option<bool>,
    pub firewall_active: Option<bool>,
    pub previous_view: Option<Option<GameView>>,
}

impl StatePatch {
    /// A patch that replaces every field, used by load-from-save.
    pub fn replace(state: GameState) -> Self {
        Self {
            view: Some(state.view),
            current_phase: Some(state.current_phase),
            player_influence: Some(state.player_influence),
            key_fragments: Some(state.key_fragments),
            active_characters: Some(state.active_characters),
            all_characters_pool: Some(state.all_characters_pool),
            game_over: Some(state.game_over),
            active_dialogue: Some(state.active_dialogue),
            player_name: Some(state.player_name),
            inventory: Some(state.inventory),
            phase_objective_complete: Some(state.phase_objective_complete),
            final_phase_started: Some(state.final_phase_started),
            pending_action: Some(state.pending_action),
            sector_tool_used: Some(state.sector_tool_used),
            modulator_active: Some(state.modulator_active),
            firewall_active: Some(state.firewall_active),
            previous_view: Some(state.previous_view),
        }
    }
}
