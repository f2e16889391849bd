//! Phase progression - objectives, roster activation, endings.

use grid_rules::{
    CharacterKind, GameView, LogStyle, MusicTrack, SoundCue, SoundEffect, StatePatch,
};

use super::Engine;

/// Trust level at which a neutral counts as converted.
pub(crate) const CONVERSION_THRESHOLD: f32 = 80.0;

impl Engine {
    /// Re-evaluate the current phase's conversion objective.
    pub fn check_phase_completion(&mut self) {
        let state = self.state();
        if state.game_over || state.phase_objective_complete {
            return;
        }

        let phase = state.current_phase;
        let Some(required) = self
            .catalog
            .phase(phase)
            .and_then(|def| def.required_conversions)
        else {
            return;
        };

        let converted = state
            .active_characters
            .values()
            .filter(|record| {
                record.kind == CharacterKind::Neutral && record.trust >= CONVERSION_THRESHOLD
            })
            .count() as u32;

        if converted >= required {
            self.apply(StatePatch {
                phase_objective_complete: Some(true),
                ..Default::default()
            });
            let line = self.catalog.strings.get("system.objective_complete");
            self.store.push_line(line, LogStyle::Positive);
        }
    }

    /// Bring the current phase's initial roster online. Characters are
    /// stamped fresh from the pool; anyone already active keeps their
    /// record.
    pub fn activate_characters_for_phase(&mut self) {
        let phase = self.state().current_phase;
        let Some(def) = self.catalog.phase(phase).cloned() else {
            tracing::warn!(phase, "no phase definition to activate");
            return;
        };

        let pool = self.state().all_characters_pool.clone();
        let mut characters = self.state().active_characters.clone();
        let mut arrivals = Vec::new();
        for id in &def.initial_active {
            if characters.contains_key(id) {
                continue;
            }
            match pool.get(id) {
                Some(base) => {
                    characters.insert(id.clone(), base.clone());
                    arrivals.push(id.clone());
                }
                None => {
                    tracing::warn!(character = %id, "phase roster names a character missing from the pool");
                }
            }
        }

        for id in &arrivals {
            let line = self
                .catalog
                .strings
                .format("system.contact_online", &[&id.to_uppercase()]);
            self.store.push_line(line, LogStyle::System);
        }
        self.apply(StatePatch {
            active_characters: Some(characters),
            ..Default::default()
        });
    }

    /// Surface the phase's designated leader.
    pub fn activate_leader_for_phase(&mut self) {
        if self.state().game_over {
            return;
        }
        let phase = self.state().current_phase;
        let Some(leader) = self.catalog.phase(phase).and_then(|def| def.leader.clone()) else {
            return;
        };
        if self.state().active_characters.contains_key(&leader) {
            return;
        }
        let Some(base) = self.state().all_characters_pool.get(&leader).cloned() else {
            tracing::warn!(character = %leader, "leader missing from the pool");
            return;
        };

        let mut characters = self.state().active_characters.clone();
        characters.insert(leader.clone(), base);
        self.apply(StatePatch {
            active_characters: Some(characters),
            ..Default::default()
        });
        let line = self
            .catalog
            .strings
            .format("system.admin_accessible", &[&leader.to_uppercase()]);
        self.store.push_line(line, LogStyle::Positive);
    }

    /// Terminal transition. Idempotent: a finished run ignores repeats.
    ///
    /// `custom_message` overrides the default defeat text; victory always
    /// uses the authored victory ending.
    pub fn end_game(&mut self, victory: bool, custom_message: Option<&str>) {
        if self.state().game_over {
            return;
        }

        self.play(SoundCue::StopMusic);
        self.store.push_line("-".repeat(50), LogStyle::System);

        if victory {
            self.play(SoundCue::Music(MusicTrack::Anthem));
            let text = self.catalog.endings.victory.clone();
            self.store.push_line(text, LogStyle::Positive);
        } else {
            self.play(SoundCue::Sfx(SoundEffect::Corruption));
            let text = custom_message
                .map(str::to_string)
                .unwrap_or_else(|| self.catalog.endings.defeat.clone());
            self.store.push_line(text, LogStyle::Negative);
        }

        self.apply(StatePatch {
            game_over: Some(true),
            active_dialogue: Some(None),
            view: Some(GameView::Ending),
            ..Default::default()
        });
        self.autosave = None;
    }
}
