//! Dialogue walking - who says what, and what choosing does.

use rand::seq::SliceRandom;
use std::time::Duration;

use grid_rules::{
    ActiveDialogue, CharacterKind, CharacterRecord, DialogueOption, DialogueSet, LogStyle,
    SoundCue, SoundEffect, StatePatch,
};

use super::command::normalize;
use super::Engine;
use crate::scheduler::DeferredAction;

/// Pause before a sole dialogue option is read out on the player's behalf.
pub const AUTO_ADVANCE_DELAY: Duration = Duration::from_millis(750);

/// Pause between a victorious line and the ending roll.
pub const VICTORY_DELAY: Duration = Duration::from_millis(2500);

/// Average influence needed before the endgame opens up.
const ENDGAME_THRESHOLD: f32 = 80.0;

impl Engine {
    /// Open a conversation with `character_id` (the talk action).
    ///
    /// Unknown contacts are reported and nothing changes. Neutral
    /// characters run one ad-lib exchange; every other kind resolves a
    /// fixed tree node from current state.
    pub fn start_dialogue(&mut self, character_id: &str) {
        let key = normalize(character_id.trim());
        let Some(record) = self.state().active_characters.get(&key).cloned() else {
            let line = self.catalog.strings.get("system.contact_unknown");
            self.store.push_line(line, LogStyle::Negative);
            return;
        };

        match record.kind {
            CharacterKind::Neutral => self.ad_lib_dialogue(&key, record),
            _ => self.fixed_dialogue(&key, record),
        }
    }

    /// One complete ad-lib exchange: opener, player line (with its trust
    /// payload), closer. Ends with an adversary move.
    fn ad_lib_dialogue(&mut self, character_id: &str, record: CharacterRecord) {
        let DialogueSet::AdLib {
            openers,
            player_lines,
            closers,
        } = record.dialogue.clone()
        else {
            tracing::warn!(character = %character_id, "neutral character without ad-lib pools");
            return;
        };

        if let Some(text) = openers.choose(&mut self.rng).cloned() {
            self.say(character_id, &record, &text);
        }

        if let Some(line) = player_lines.choose(&mut self.rng).cloned() {
            self.store
                .push_line(format!("> {}", line.text), LogStyle::Player);
            self.apply_interaction(character_id, line.trust_effect);
        }

        if let Some(text) = closers.choose(&mut self.rng).cloned() {
            // The closer is styled by the trust the exchange just settled on.
            if let Some(current) = self.state().active_characters.get(character_id).cloned() {
                self.say(character_id, &current, &text);
            }
        }

        self.adversary_tick();
    }

    /// Resolve which fixed-tree node a character opens on.
    ///
    /// The guide briefs by phase (start or end node depending on the
    /// objective) until the final phase, where readiness is gated on
    /// average influence. The sage refuses interaction below the same
    /// gate and latches the endgame above it.
    fn fixed_dialogue(&mut self, character_id: &str, record: CharacterRecord) {
        let mut node_key = String::from("initial");

        if record.kind == CharacterKind::Guide {
            let phase = self.state().current_phase;
            if self.catalog.phase(phase).is_none() {
                tracing::warn!(phase, "guide has nothing to say without a phase definition");
                return;
            }
            node_key = if phase < self.catalog.config.final_phase {
                if self.state().phase_objective_complete {
                    format!("phase_{phase}_end")
                } else {
                    format!("phase_{phase}_start")
                }
            } else if self.average_influence() > ENDGAME_THRESHOLD {
                "final_ready".to_string()
            } else {
                "final_wait".to_string()
            };
        }

        if record.kind == CharacterKind::Sage {
            if self.average_influence() <= ENDGAME_THRESHOLD {
                let line = self.catalog.strings.get("system.mainframe_shielded");
                self.store.push_line(line, LogStyle::Negative);
                self.play(SoundCue::Sfx(SoundEffect::Corruption));
                return;
            }
            self.apply(StatePatch {
                final_phase_started: Some(true),
                ..Default::default()
            });
        }

        self.show_node(character_id, &node_key);
    }

    /// Print a node and stage its options.
    ///
    /// A missing or textless node ends the conversation. A sole option is
    /// read out on the player's behalf after a short pause; several are
    /// stored in `active_dialogue` and listed, substituting a locked
    /// placeholder for options gated behind a fragment the player lacks.
    pub(crate) fn show_node(&mut self, character_id: &str, node_key: &str) {
        let Some(record) = self.state().active_characters.get(character_id).cloned() else {
            return;
        };
        let node = record.dialogue.node(node_key).cloned();
        let Some(node) = node.filter(|n| !n.text.is_empty()) else {
            let line = self.catalog.strings.format(
                "system.transmission_closed",
                &[&character_id.to_uppercase()],
            );
            self.store.push_line(line, LogStyle::System);
            self.apply(StatePatch {
                active_dialogue: Some(None),
                ..Default::default()
            });
            return;
        };

        self.say(character_id, &record, &node.text);

        match node.options.len() {
            0 => {
                self.apply(StatePatch {
                    active_dialogue: Some(None),
                    ..Default::default()
                });
            }
            1 => {
                self.schedule(
                    AUTO_ADVANCE_DELAY,
                    DeferredAction::AdvanceSoleOption {
                        character_id: character_id.to_string(),
                        node_key: node_key.to_string(),
                    },
                );
            }
            _ => {
                self.apply(StatePatch {
                    active_dialogue: Some(Some(ActiveDialogue {
                        character_id: character_id.to_string(),
                        options: node.options.clone(),
                    })),
                    ..Default::default()
                });
                let locked = self.catalog.strings.get("dialogue.option_locked");
                for (i, option) in node.options.iter().enumerate() {
                    let held = option
                        .requires_fragment
                        .as_ref()
                        .map_or(true, |f| self.state().key_fragments.contains(f));
                    if held {
                        self.store
                            .push_line(format!("  {}. {}", i + 1, option.text), LogStyle::Player);
                    } else {
                        self.store
                            .push_line(format!("  {}. {}", i + 1, locked), LogStyle::System);
                    }
                }
            }
        }
    }

    /// Apply a chosen option's effects and continue or close the dialogue.
    pub(crate) fn choose_option(&mut self, character_id: &str, option: &DialogueOption) {
        let Some(record) = self.state().active_characters.get(character_id).cloned() else {
            return;
        };

        self.store
            .push_line(format!("> {}", option.text), LogStyle::Player);
        self.apply_interaction(character_id, option.trust_effect);

        if let Some(item_id) = &option.grants_item {
            let mut inventory = self.state().inventory.clone();
            let count = inventory.entry(item_id.clone()).or_insert(0);
            *count += 1;
            let total = *count;
            self.apply(StatePatch {
                inventory: Some(inventory),
                ..Default::default()
            });
            let name = self
                .catalog
                .items
                .get(item_id)
                .map(|item| item.name.clone())
                .unwrap_or_else(|| item_id.clone());
            let line = self
                .catalog
                .strings
                .format("system.item_acquired", &[&name, &total.to_string()]);
            self.store.push_line(line, LogStyle::Positive);
            self.play(SoundCue::Sfx(SoundEffect::Success));
        }

        if let Some(fragment) = option.grants_fragment.clone() {
            if !self.state().key_fragments.contains(&fragment) {
                self.add_key_fragment(&fragment);
            }
        }

        // A completed objective makes the guide surface the sector admin.
        if record.kind == CharacterKind::Guide && self.state().phase_objective_complete {
            self.activate_leader_for_phase();
        }

        // A leader handing over their fragment closes the phase.
        if record.kind == CharacterKind::Leader && option.grants_fragment.is_some() {
            let next = self.state().current_phase + 1;
            self.apply(StatePatch {
                current_phase: Some(next),
                phase_objective_complete: Some(false),
                ..Default::default()
            });
            self.activate_characters_for_phase();
        }

        let follow_up = option
            .next_node
            .as_ref()
            .filter(|key| record.dialogue.node(key).is_some())
            .cloned();
        match follow_up {
            Some(key) => {
                self.show_node(character_id, &key);
                if option.victory {
                    self.schedule(VICTORY_DELAY, DeferredAction::WinEnding);
                }
            }
            None => {
                self.apply(StatePatch {
                    active_dialogue: Some(None),
                    ..Default::default()
                });
                self.adversary_tick();
            }
        }
    }

    /// Parse an answer command ("answer 2") into a 1-based option pick.
    pub(crate) fn answer(&mut self, raw: &str) {
        let Some(dialogue) = self.state().active_dialogue.clone() else {
            return;
        };

        let index = raw
            .split_whitespace()
            .nth(1)
            .and_then(|token| token.parse::<usize>().ok())
            .filter(|i| (1..=dialogue.options.len()).contains(i));
        let Some(index) = index else {
            let line = self.catalog.strings.get("system.invalid_answer");
            self.store.push_line(line, LogStyle::Negative);
            return;
        };

        self.choose_option(&dialogue.character_id, &dialogue.options[index - 1]);
    }

    /// Record a newly found key fragment and re-check the objective.
    pub(crate) fn add_key_fragment(&mut self, fragment: &str) {
        let mut fragments = self.state().key_fragments.clone();
        fragments.insert(fragment.to_string());
        self.apply(StatePatch {
            key_fragments: Some(fragments),
            ..Default::default()
        });
        let line = self
            .catalog
            .strings
            .format("system.fragment_acquired", &[fragment]);
        self.store.push_line(line, LogStyle::Positive);
        self.check_phase_completion();
    }

    fn say(&mut self, character_id: &str, record: &CharacterRecord, text: &str) {
        self.store.push_line(
            format!("[{}]: {}", character_id.to_uppercase(), text),
            record.log_style(),
        );
    }
}
