//! Deferred actions - the pacing timers that re-enter the engine.
//!
//! The host owns the clock: it drains [`Engine::take_scheduled`], waits
//! out each delay, and hands the action back to [`Engine::fire`]. Every
//! action carries the epoch it was scheduled under and is re-validated
//! against current state before acting, so timers that outlive a reset or
//! a load are inert.

use std::time::Duration;

use crate::engine::Engine;

/// A continuation the host should deliver back after `delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scheduled {
    pub delay: Duration,
    pub epoch: u64,
    pub action: DeferredAction,
}

/// What a fired timer does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeferredAction {
    /// Read a sole dialogue option aloud on the player's behalf.
    AdvanceSoleOption {
        character_id: String,
        node_key: String,
    },
    /// Roll the victory ending after the closing line has landed.
    WinEnding,
}

impl Engine {
    /// Execute a previously scheduled action if it still applies.
    ///
    /// Guards: the epoch must match, the run must still be live, the
    /// character must still be active, and the node must still be a
    /// sole-option node. Anything stale is dropped without effect.
    pub fn fire(&mut self, scheduled: Scheduled) {
        if scheduled.epoch != self.epoch {
            tracing::debug!(action = ?scheduled.action, "dropping timer from an older epoch");
            return;
        }

        match scheduled.action {
            DeferredAction::AdvanceSoleOption {
                character_id,
                node_key,
            } => {
                if self.state().game_over {
                    return;
                }
                let Some(record) = self.state().active_characters.get(&character_id).cloned()
                else {
                    return;
                };
                let Some(node) = record.dialogue.node(&node_key).cloned() else {
                    return;
                };
                if node.options.len() != 1 {
                    return;
                }
                self.choose_option(&character_id, &node.options[0]);
            }
            DeferredAction::WinEnding => self.end_game(true, None),
        }
    }
}
