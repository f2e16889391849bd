//! The adversary ("ICE") - probabilistic counter-play after free turns.

use rand::seq::SliceRandom;
use rand::Rng;

use grid_rules::{CharacterKind, LogStyle, SoundCue, SoundEffect, StatePatch};

use super::Engine;

/// Attack-chance multiplier while the signal modulator is active.
const MODULATOR_DAMPENING: f64 = 0.90;

impl Engine {
    /// One counter-play roll.
    ///
    /// Suppressed entirely while the run is over, the endgame has started,
    /// the firewall is up, or ICE is disabled in content. Otherwise, with
    /// the configured chance (dampened by an active modulator) and at
    /// least one active adversary and one active neutral, a random
    /// adversary halves a random neutral's trust.
    pub fn adversary_tick(&mut self) {
        let state = self.state();
        if state.game_over || state.final_phase_started || state.firewall_active {
            return;
        }
        if !self.catalog.config.ice.enabled {
            return;
        }

        let adversaries: Vec<String> = state
            .active_characters
            .iter()
            .filter(|(_, record)| record.kind == CharacterKind::Adversary)
            .map(|(id, _)| id.clone())
            .collect();
        let neutrals: Vec<String> = state
            .active_characters
            .iter()
            .filter(|(_, record)| record.kind == CharacterKind::Neutral)
            .map(|(id, _)| id.clone())
            .collect();

        let mut chance = self.catalog.config.ice.attack_chance;
        if state.modulator_active {
            chance *= MODULATOR_DAMPENING;
        }

        if adversaries.is_empty() || neutrals.is_empty() {
            return;
        }
        if self.rng.gen::<f64>() >= chance {
            return;
        }

        let Some(agent) = adversaries.choose(&mut self.rng).cloned() else {
            return;
        };
        let Some(target) = neutrals.choose(&mut self.rng).cloned() else {
            return;
        };

        let mut characters = self.state().active_characters.clone();
        let Some(npc) = characters.get_mut(&target) else {
            return;
        };
        npc.trust /= 2.0;
        let new_trust = npc.trust;

        let line = self
            .catalog
            .strings
            .format("ice.attack", &[&agent.to_uppercase(), &target.to_uppercase()]);
        self.store.push_line(line, LogStyle::Agent);
        self.play(SoundCue::Sfx(SoundEffect::Corruption));

        let line = self.catalog.strings.format(
            "ice.trust_dropped",
            &[&target.to_uppercase(), &format!("{new_trust:.0}")],
        );
        self.store.push_line(line, LogStyle::Negative);

        self.apply(StatePatch {
            active_characters: Some(characters),
            ..Default::default()
        });
    }
}
