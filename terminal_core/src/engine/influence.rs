//! Trust/influence resolution - the numeric negotiation behind every
//! dialogue interaction.

use grid_rules::{CharacterKind, LogStyle, SoundCue, SoundEffect, StatePatch};

use super::Engine;

fn clamp_percent(value: f32) -> f32 {
    value.clamp(0.0, 100.0)
}

impl Engine {
    /// Apply a dialogue effect between the player and `character_id`.
    ///
    /// Non-neutral kinds take a one-directional influence push with no
    /// feedback into their own trust. Neutral kinds take the coupled
    /// convergence step: the effect lands on trust, then half the gap
    /// between influence and trust moves each value toward the other.
    /// Returns whether the character's trust strictly rose (advisory).
    pub(crate) fn apply_interaction(&mut self, character_id: &str, effect: f32) -> bool {
        let Some(record) = self.state().active_characters.get(character_id).cloned() else {
            return false;
        };

        if record.kind != CharacterKind::Neutral {
            if effect != 0.0 {
                let before = self.state().player_influence;
                let after = clamp_percent(before + effect);
                if after > before {
                    self.play(SoundCue::Sfx(SoundEffect::Chime));
                }
                self.apply(StatePatch {
                    player_influence: Some(after),
                    ..Default::default()
                });
                let line = self.catalog.strings.format(
                    "influence.boosted",
                    &[&character_id.to_uppercase(), &format!("{after:.0}")],
                );
                self.store.push_line(line, LogStyle::Positive);
            }
            return false;
        }

        let mut characters = self.state().active_characters.clone();
        let Some(npc) = characters.get_mut(character_id) else {
            return false;
        };

        let trust_before = npc.trust;
        npc.trust += effect;

        let influence_before = self.state().player_influence;
        let gap = influence_before - npc.trust;
        let shift = gap / 2.0;

        let new_influence = clamp_percent(influence_before - shift);
        npc.trust = clamp_percent(npc.trust + shift);
        let new_trust = npc.trust;

        if new_influence > influence_before || new_trust > trust_before {
            self.play(SoundCue::Sfx(SoundEffect::Chime));
        }

        self.apply(StatePatch {
            player_influence: Some(new_influence),
            active_characters: Some(characters),
            ..Default::default()
        });

        let line = self.catalog.strings.format(
            "influence.report",
            &[
                &format!("{new_influence:.0}"),
                &character_id.to_uppercase(),
                &format!("{new_trust:.0}"),
            ],
        );
        self.store.push_line(line, LogStyle::System);

        self.check_phase_completion();
        new_trust > trust_before
    }

    /// Session-wide standing: the player folded in as one implicit
    /// participant alongside every active character.
    pub fn average_influence(&self) -> f32 {
        let state = self.state();
        if state.active_characters.is_empty() {
            return state.player_influence;
        }
        let total: f32 = state.player_influence
            + state
                .active_characters
                .values()
                .map(|record| record.trust)
                .sum::<f32>();
        total / (state.active_characters.len() as f32 + 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testkit;
    use super::*;

    #[test]
    fn test_neutral_convergence_step() {
        let mut engine = testkit::running_engine();
        // influence 70, vesper trust 50, effect 0: gap 20, shift 10.
        let rose = engine.apply_interaction("vesper", 0.0);

        assert!(rose);
        assert_eq!(engine.state().player_influence, 60.0);
        assert_eq!(engine.state().active_characters["vesper"].trust, 60.0);
    }

    #[test]
    fn test_neutral_effect_lands_before_the_gap() {
        let mut engine = testkit::running_engine();
        // trust 50 + 10 = 60, gap 10, shift 5 -> influence 65, trust 65.
        engine.apply_interaction("vesper", 10.0);

        assert_eq!(engine.state().player_influence, 65.0);
        assert_eq!(engine.state().active_characters["vesper"].trust, 65.0);
    }

    #[test]
    fn test_neutral_values_stay_clamped() {
        let mut engine = testkit::running_engine();
        for _ in 0..50 {
            engine.apply_interaction("vesper", 40.0);
        }
        let trust = engine.state().active_characters["vesper"].trust;
        let influence = engine.state().player_influence;
        assert!((0.0..=100.0).contains(&trust));
        assert!((0.0..=100.0).contains(&influence));

        for _ in 0..50 {
            engine.apply_interaction("vesper", -80.0);
        }
        let trust = engine.state().active_characters["vesper"].trust;
        let influence = engine.state().player_influence;
        assert!((0.0..=100.0).contains(&trust));
        assert!((0.0..=100.0).contains(&influence));
    }

    #[test]
    fn test_non_neutral_push_is_one_directional() {
        let mut engine = testkit::running_engine();

        let rose = engine.apply_interaction("oracle", 15.0);

        assert!(!rose);
        assert_eq!(engine.state().player_influence, 85.0);
        assert_eq!(engine.state().active_characters["oracle"].trust, 0.0);
        assert!(engine
            .take_sounds()
            .contains(&SoundCue::Sfx(SoundEffect::Chime)));
    }

    #[test]
    fn test_non_neutral_push_clamps_at_hundred() {
        let mut engine = testkit::running_engine();

        engine.apply_interaction("oracle", 500.0);

        assert_eq!(engine.state().player_influence, 100.0);
    }

    #[test]
    fn test_non_neutral_zero_effect_is_silent() {
        let mut engine = testkit::running_engine();

        engine.apply_interaction("oracle", 0.0);

        assert!(engine.log().is_empty());
        assert!(engine.take_sounds().is_empty());
        assert_eq!(engine.state().player_influence, 70.0);
    }

    #[test]
    fn test_average_folds_the_player_in() {
        let mut engine = testkit::running_engine();
        // oracle 0 + vesper 50 + mirage 40 + cipher 0 + player 70 = 160 / 5.
        assert!((engine.average_influence() - 32.0).abs() < f32::EPSILON);

        engine.store.apply(StatePatch {
            active_characters: Some(Default::default()),
            ..Default::default()
        });
        assert_eq!(engine.average_influence(), 70.0);
    }
}
