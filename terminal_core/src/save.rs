//! Save documents and load-time reconciliation.
//!
//! The core only serializes and deserializes; reading and writing the
//! actual file is the host's job.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

use grid_rules::{CharacterRecord, GameState, GameView, LogLine, LogStyle, StatePatch};

use crate::engine::{Engine, HostRequest};

/// Log lines carried along with a save for context on reload.
const SAVED_LOG_WINDOW: usize = 10;

/// Errors surfaced while reading a save document.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("malformed save document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// The serialized snapshot written out by the save action: the full game
/// state plus a trailing window of terminal history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveDocument {
    pub state: GameState,
    #[serde(default)]
    pub recent_log: Vec<LogLine>,
}

impl Engine {
    /// Serialize the current session into a save document.
    pub fn make_save_document(&self) -> String {
        let document = SaveDocument {
            state: self.state().clone(),
            recent_log: self.store.log_tail(SAVED_LOG_WINDOW),
        };
        match serde_json::to_string_pretty(&document) {
            Ok(json) => json,
            Err(err) => {
                tracing::error!(%err, "failed to serialize save document");
                String::new()
            }
        }
    }

    /// The save action: produce a document and hand it to the host.
    pub fn export_save(&mut self) {
        let json = self.make_save_document();
        self.requests.push(HostRequest::DeliverSave(json));
        let line = self.catalog.strings.get("save.exported");
        self.store.push_line(line, LogStyle::Positive);
    }

    /// Keep a background snapshot; an ending discards it.
    pub fn write_autosave(&mut self) {
        self.autosave = Some(self.make_save_document());
    }

    /// The last autosave snapshot, if one survived.
    pub fn autosave(&self) -> Option<&str> {
        self.autosave.as_deref()
    }

    /// Load a save document, all or nothing.
    ///
    /// A parse failure logs one error line and leaves the in-memory state
    /// untouched. On success the view is forced back to gameplay, the
    /// saved log window is replayed behind a separator, and the active
    /// roster is rebuilt by replaying every phase up to the saved one -
    /// phase definitions may have changed since the save was written, so
    /// saved records are preferred but the pool fills any gaps.
    pub fn load_save(&mut self, json: &str) -> Result<(), SaveError> {
        let document: SaveDocument = match serde_json::from_str(json) {
            Ok(document) => document,
            Err(err) => {
                let line = self.catalog.strings.get("save.corrupted");
                self.store.push_line(line, LogStyle::Negative);
                return Err(SaveError::Malformed(err));
            }
        };

        // Timers from the session being replaced must never fire.
        self.epoch += 1;

        let mut state = document.state;
        state.view = GameView::Gameplay;

        self.store.clear_log();
        if !document.recent_log.is_empty() {
            self.store.push_block(document.recent_log);
            self.store.push_line("-".repeat(50), LogStyle::System);
        }

        let saved_characters = std::mem::take(&mut state.active_characters);
        let saved_phase = state.current_phase;
        let objective_complete = state.phase_objective_complete;
        let pool = state.all_characters_pool.clone();
        self.store.apply(StatePatch::replace(state));

        let mut rebuilt = BTreeMap::new();
        for phase in 1..=saved_phase {
            let Some(def) = self.catalog.phase(phase) else {
                tracing::warn!(phase, "saved game references a phase with no definition");
                continue;
            };
            for id in &def.initial_active {
                adopt(&saved_characters, &pool, id, &mut rebuilt);
            }
            let leader_unlocked =
                phase < saved_phase || (phase == saved_phase && objective_complete);
            if leader_unlocked {
                if let Some(leader) = &def.leader {
                    adopt(&saved_characters, &pool, leader, &mut rebuilt);
                }
            }
        }
        self.store.apply(StatePatch {
            active_characters: Some(rebuilt),
            ..Default::default()
        });

        let line = self.catalog.strings.get("save.loaded");
        self.store.push_line(line, LogStyle::Positive);
        Ok(())
    }
}

/// Carry one character into the rebuilt roster, preferring the saved
/// record over a fresh pool copy.
fn adopt(
    saved: &BTreeMap<String, CharacterRecord>,
    pool: &BTreeMap<String, CharacterRecord>,
    id: &str,
    rebuilt: &mut BTreeMap<String, CharacterRecord>,
) {
    if let Some(record) = saved.get(id) {
        rebuilt.insert(id.to_string(), record.clone());
    } else if let Some(base) = pool.get(id) {
        rebuilt.insert(id.to_string(), base.clone());
    } else {
        tracing::warn!(character = %id, "saved roster references a character missing from the pool");
    }
}
