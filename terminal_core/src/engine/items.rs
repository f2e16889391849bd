//! Item use - the software the player runs from inventory.

use grid_rules::{
    CharacterKind, ItemEffect, LogStyle, PendingAction, PendingStep, SoundCue, SoundEffect,
    StatePatch,
};

use super::command::normalize;
use super::Engine;

impl Engine {
    /// The use-item action: find the named software and run its effect.
    /// Items are matched by normalized display-name prefix, so "use ping"
    /// finds "Ping Sweep".
    pub fn use_item(&mut self, item_name: &str) {
        if item_name.trim().is_empty() {
            let line = self.catalog.strings.get("items.usage_hint");
            self.store.push_line(line, LogStyle::Negative);
            return;
        }

        let wanted = normalize(item_name.trim());
        let found = self
            .catalog
            .items
            .iter()
            .find(|(_, def)| normalize(&def.name).starts_with(&wanted))
            .map(|(id, def)| (id.clone(), def.effect.clone()));

        let owned = found
            .as_ref()
            .map(|(id, _)| self.state().inventory.get(id).copied().unwrap_or(0) > 0)
            .unwrap_or(false);
        let Some((item_id, effect)) = found.filter(|_| owned) else {
            let line = self
                .catalog
                .strings
                .format("items.not_owned", &[item_name]);
            self.store.push_line(line, LogStyle::Negative);
            return;
        };

        match effect {
            ItemEffect::SectorPing { influence_gain } => self.use_sector_ping(influence_gain),
            ItemEffect::RootkitOverride => self.arm_rootkit(&item_id),
            ItemEffect::ModulatorToggle => self.toggle_modulator(),
            ItemEffect::FirewallToggle => self.toggle_firewall(),
        }
    }

    /// Influence boost, once per sector; the reload rides on phase advance.
    fn use_sector_ping(&mut self, influence_gain: f32) {
        if self.state().sector_tool_used {
            let line = self.catalog.strings.get("items.ping_exhausted");
            self.store.push_line(line, LogStyle::Negative);
            return;
        }

        let before = self.state().player_influence;
        let after = (before + influence_gain).min(100.0);
        if after > before {
            self.play(SoundCue::Sfx(SoundEffect::Chime));
        }
        self.apply(StatePatch {
            player_influence: Some(after),
            sector_tool_used: Some(true),
            ..Default::default()
        });
        let line = self
            .catalog
            .strings
            .format("items.ping_executed", &[&format!("{after:.0}")]);
        self.store.push_line(line, LogStyle::Positive);
    }

    /// First rootkit step: arm the pending action and ask for a codename.
    fn arm_rootkit(&mut self, item_id: &str) {
        self.apply(StatePatch {
            pending_action: Some(Some(PendingAction {
                item_id: item_id.to_string(),
                step: PendingStep::AwaitingTarget,
            })),
            ..Default::default()
        });
        let line = self.catalog.strings.get("items.rootkit_prompt");
        self.store.push_line(line, LogStyle::System);
    }

    fn toggle_modulator(&mut self) {
        let active = !self.state().modulator_active;
        self.apply(StatePatch {
            modulator_active: Some(active),
            ..Default::default()
        });
        let key = if active {
            "items.modulator_on"
        } else {
            "items.modulator_off"
        };
        let line = self.catalog.strings.get(key);
        self.store.push_line(line, LogStyle::Positive);
    }

    fn toggle_firewall(&mut self) {
        let active = !self.state().firewall_active;
        self.apply(StatePatch {
            firewall_active: Some(active),
            ..Default::default()
        });
        let key = if active {
            "items.firewall_on"
        } else {
            "items.firewall_off"
        };
        let line = self.catalog.strings.get(key);
        self.store.push_line(line, LogStyle::Positive);
    }

    /// Route a raw input line captured by an armed two-step action. The
    /// pending action is always cleared by its handler.
    pub(crate) fn resolve_pending(&mut self, pending: PendingAction, raw: &str) {
        match self.catalog.items.get(&pending.item_id).map(|def| &def.effect) {
            Some(ItemEffect::RootkitOverride) => self.apply_rootkit(&pending.item_id, raw),
            _ => {
                tracing::warn!(item = %pending.item_id, "pending action for an item with no target step");
                self.apply(StatePatch {
                    pending_action: Some(None),
                    ..Default::default()
                });
            }
        }
    }

    /// Second rootkit step: full-trust grant on a neutral target. Any
    /// other target kind rejects, clears the pending action, and leaves
    /// both trust and inventory untouched.
    pub(crate) fn apply_rootkit(&mut self, item_id: &str, target_raw: &str) {
        let target = normalize(target_raw.trim());
        let record = self.state().active_characters.get(&target).cloned();

        match record {
            Some(record) if record.kind == CharacterKind::Neutral => {
                let mut characters = self.state().active_characters.clone();
                if let Some(npc) = characters.get_mut(&target) {
                    npc.trust = 100.0;
                }
                let mut inventory = self.state().inventory.clone();
                if let Some(count) = inventory.get_mut(item_id) {
                    *count = count.saturating_sub(1);
                }
                self.apply(StatePatch {
                    active_characters: Some(characters),
                    inventory: Some(inventory),
                    pending_action: Some(None),
                    ..Default::default()
                });
                let line = self
                    .catalog
                    .strings
                    .format("items.rootkit_success", &[&target.to_uppercase()]);
                self.store.push_line(line, LogStyle::Positive);
                self.check_phase_completion();
            }
            _ => {
                let line = self.catalog.strings.get("items.rootkit_invalid_target");
                self.store.push_line(line, LogStyle::Negative);
                self.play(SoundCue::Sfx(SoundEffect::Corruption));
                self.apply(StatePatch {
                    pending_action: Some(None),
                    ..Default::default()
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::testkit;
    use super::*;

    fn stocked_engine() -> Engine {
        let mut engine = testkit::running_engine();
        let mut inventory = engine.state().inventory.clone();
        inventory.insert("ping_sweep".to_string(), 1);
        inventory.insert("rootkit".to_string(), 2);
        inventory.insert("modulator".to_string(), 1);
        inventory.insert("firewall_breaker".to_string(), 1);
        engine.store.apply(StatePatch {
            inventory: Some(inventory),
            ..Default::default()
        });
        engine
    }

    #[test]
    fn test_empty_argument_prints_usage() {
        let mut engine = stocked_engine();
        engine.use_item("  ");
        assert_eq!(engine.log()[0].text, "items.usage_hint");
    }

    #[test]
    fn test_unowned_item_is_rejected() {
        let mut engine = testkit::running_engine();
        engine.use_item("ping");
        assert_eq!(engine.log()[0].style, LogStyle::Negative);
    }

    #[test]
    fn test_ping_is_single_use_per_sector() {
        let mut engine = stocked_engine();

        engine.use_item("ping");
        assert_eq!(engine.state().player_influence, 75.0);
        assert!(engine.state().sector_tool_used);
        // The charge is not consumed; the sector latch gates it instead.
        assert_eq!(engine.state().inventory["ping_sweep"], 1);

        engine.use_item("ping");
        assert_eq!(engine.state().player_influence, 75.0);
        assert!(engine
            .log()
            .iter()
            .any(|l| l.text == "items.ping_exhausted"));
    }

    #[test]
    fn test_prefix_match_finds_items() {
        let mut engine = stocked_engine();
        engine.use_item("signal mod");
        assert!(engine.state().modulator_active);
    }

    #[test]
    fn test_toggles_flip_back() {
        let mut engine = stocked_engine();

        engine.use_item("firewall");
        assert!(engine.state().firewall_active);
        engine.use_item("firewall");
        assert!(!engine.state().firewall_active);
    }

    #[test]
    fn test_rootkit_two_step_on_neutral() {
        let mut engine = stocked_engine();

        engine.use_item("rootkit");
        assert!(engine.state().pending_action.is_some());

        engine.process_command("Vesper");

        assert!(engine.state().pending_action.is_none());
        assert_eq!(engine.state().active_characters["vesper"].trust, 100.0);
        assert_eq!(engine.state().inventory["rootkit"], 1);
    }

    #[test]
    fn test_rootkit_rejects_non_neutral_target() {
        let mut engine = stocked_engine();
        engine.use_item("rootkit");
        engine.store.clear_log();

        engine.process_command("oracle");

        assert!(engine.state().pending_action.is_none());
        assert_eq!(engine.state().active_characters["oracle"].trust, 0.0);
        assert_eq!(engine.state().inventory["rootkit"], 2);
        assert_eq!(engine.log()[0].text, "items.rootkit_invalid_target");
        assert!(engine
            .take_sounds()
            .contains(&SoundCue::Sfx(SoundEffect::Corruption)));
    }

    #[test]
    fn test_rootkit_completion_check_runs() {
        let mut engine = stocked_engine();
        let mut characters = engine.state().active_characters.clone();
        characters.get_mut("mirage").unwrap().trust = 85.0;
        engine.store.apply(StatePatch {
            active_characters: Some(characters),
            ..Default::default()
        });

        engine.use_item("rootkit");
        engine.process_command("vesper");

        // vesper at 100 plus mirage at 85 satisfies the two conversions.
        assert!(engine.state().phase_objective_complete);
    }
}
