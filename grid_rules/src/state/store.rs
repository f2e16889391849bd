//! The state store - the only mutation path into the game state.

use crate::events::{LogLine, LogStyle};
use crate::state::{GameState, StatePatch};

/// Owns the canonical [`GameState`] and the terminal log buffer.
///
/// Every component mutates state exclusively through [`StateStore::apply`]
/// (or by cloning a character map, editing the clone, and re-submitting it
/// in a patch). The store enforces the cross-cutting phase-advance
/// invariant on every merge.
#[derive(Debug)]
pub struct StateStore {
    state: GameState,
    log: Vec<LogLine>,
    /// Resolved notification text pushed when the sector tool reloads.
    tool_reload_line: String,
}

impl StateStore {
    /// Create a store in the pristine initial state.
    pub fn new(tool_reload_line: impl Into<String>) -> Self {
        Self {
            state: GameState::initial(),
            log: Vec::new(),
            tool_reload_line: tool_reload_line.into(),
        }
    }

    /// Current snapshot.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Shallow-merge `patch` into the current state and return the result.
    ///
    /// If the merge strictly raises `current_phase`, the single-use sector
    /// tool is reloaded and a system notification is pushed before
    /// returning. A merge that leaves the phase equal never re-triggers
    /// the side effect, so re-submitting an unchanged phase is a no-op.
    pub fn apply(&mut self, patch: StatePatch) -> &GameState {
        let phase_before = self.state.current_phase;

        if let Some(view) = patch.view {
            self.state.view = view;
        }
        if let Some(phase) = patch.current_phase {
            self.state.current_phase = phase;
        }
        if let Some(influence) = patch.player_influence {
            self.state.player_influence = influence;
        }
        if let Some(fragments) = patch.key_fragments {
            self.state.key_fragments = fragments;
        }
        if let Some(characters) = patch.active_characters {
            self.state.active_characters = characters;
        }
        if let Some(pool) = patch.all_characters_pool {
            self.state.all_characters_pool = pool;
        }
        if let Some(game_over) = patch.game_over {
            self.state.game_over = game_over;
        }
        if let Some(dialogue) = patch.active_dialogue {
            self.state.active_dialogue = dialogue;
        }
        if let Some(name) = patch.player_name {
            self.state.player_name = name;
        }
        if let Some(inventory) = patch.inventory {
            self.state.inventory = inventory;
        }
        if let Some(complete) = patch.phase_objective_complete {
            self.state.phase_objective_complete = complete;
        }
        if let Some(started) = patch.final_phase_started {
            self.state.final_phase_started = started;
        }
        if let Some(pending) = patch.pending_action {
            self.state.pending_action = pending;
        }
        if let Some(used) = patch.sector_tool_used {
            self.state.sector_tool_used = used;
        }
        if let Some(active) = patch.modulator_active {
            self.state.modulator_active = active;
        }
        if let Some(active) = patch.firewall_active {
            self.state.firewall_active = active;
        }
        if let Some(previous) = patch.previous_view {
            self.state.previous_view = previous;
        }

        if self.state.current_phase > phase_before {
            tracing::debug!(
                from = phase_before,
                to = self.state.current_phase,
                "phase advanced, reloading sector tool"
            );
            self.state.sector_tool_used = false;
            let line = self.tool_reload_line.clone();
            self.push_line(line, LogStyle::Positive);
        }

        &self.state
    }

    /// Drop back to the pristine initial state. The log is left alone;
    /// flows that need a blank terminal clear it themselves.
    pub fn reset(&mut self) {
        self.state = GameState::initial();
    }

    /// Append one line to the terminal log.
    pub fn push_line(&mut self, text: impl Into<String>, style: LogStyle) {
        self.log.push(LogLine::new(text, style));
    }

    /// Append a block of prebuilt lines (save-window replay).
    pub fn push_block(&mut self, lines: impl IntoIterator<Item = LogLine>) {
        self.log.extend(lines);
    }

    /// Wipe the terminal log.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Everything logged so far.
    pub fn log(&self) -> &[LogLine] {
        &self.log
    }

    /// The last `n` log lines, oldest first.
    pub fn log_tail(&self, n: usize) -> Vec<LogLine> {
        let start = self.log.len().saturating_sub(n);
        self.log[start..].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameView;

    fn store() -> StateStore {
        StateStore::new("sector tool reloaded")
    }

    #[test]
    fn test_merge_keeps_unpatched_fields() {
        let mut store = store();
        store.apply(StatePatch {
            player_influence: Some(42.0),
            ..Default::default()
        });

        assert_eq!(store.state().player_influence, 42.0);
        assert_eq!(store.state().current_phase, 1);
        assert_eq!(store.state().view, GameView::Loading);
    }

    #[test]
    fn test_phase_advance_reloads_sector_tool() {
        let mut store = store();
        store.apply(StatePatch {
            sector_tool_used: Some(true),
            ..Default::default()
        });

        store.apply(StatePatch {
            current_phase: Some(2),
            ..Default::default()
        });

        assert!(!store.state().sector_tool_used);
        assert_eq!(store.log().len(), 1);
        assert_eq!(store.log()[0].text, "sector tool reloaded");
        assert_eq!(store.log()[0].style, LogStyle::Positive);
    }

    #[test]
    fn test_equal_phase_merge_is_silent() {
        let mut store = store();
        store.apply(StatePatch {
            sector_tool_used: Some(true),
            ..Default::default()
        });

        store.apply(StatePatch {
            current_phase: Some(1),
            ..Default::default()
        });

        assert!(store.state().sector_tool_used);
        assert!(store.log().is_empty());
    }

    #[test]
    fn test_patch_can_clear_optionals() {
        let mut store = store();
        store.apply(StatePatch {
            previous_view: Some(Some(GameView::Menu)),
            ..Default::default()
        });
        assert_eq!(store.state().previous_view, Some(GameView::Menu));

        store.apply(StatePatch {
            previous_view: Some(None),
            ..Default::default()
        });
        assert_eq!(store.state().previous_view, None);
    }

    #[test]
    fn test_reset_leaves_log() {
        let mut store = store();
        store.push_line("hello", LogStyle::System);
        store.apply(StatePatch {
            current_phase: Some(3),
            ..Default::default()
        });

        store.reset();

        assert_eq!(store.state().current_phase, 1);
        assert_eq!(store.log().len(), 2);
    }

    #[test]
    fn test_log_tail() {
        let mut store = store();
        for i in 0..15 {
            store.push_line(format!("line {i}"), LogStyle::System);
        }

        let tail = store.log_tail(10);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail[0].text, "line 5");
        assert_eq!(tail[9].text, "line 14");

        assert_eq!(store.log_tail(100).len(), 15);
    }
}
