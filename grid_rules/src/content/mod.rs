//! The content catalog - externally authored, read-only game data.
//!
//! The engine queries the catalog but never mutates it. Shapes are
//! validated once at load time so access paths can stay silent about
//! authoring gaps.

mod strings;

pub use strings::*;

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::characters::{CharacterKind, CharacterRecord};
use crate::dialogue::DialogueSet;
use crate::state::{GameState, PENDING_NAME};

/// Errors surfaced while loading or validating catalog data.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("catalog parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("phase {phase} references unknown character '{id}'")]
    UnknownCharacter { phase: u32, id: String },
    #[error("config names unknown guide character '{0}'")]
    UnknownGuide(String),
}

/// Template a live character is stamped from at game start.
#[derive(Debug, Clone, Deserialize)]
pub struct CharacterTemplate {
    pub kind: CharacterKind,
    #[serde(default)]
    pub trust: f32,
    pub dialogue: DialogueSet,
}

impl CharacterTemplate {
    /// Deep-copy this template into a live record.
    pub fn instantiate(&self) -> CharacterRecord {
        CharacterRecord {
            kind: self.kind,
            trust: self.trust,
            dialogue: self.dialogue.clone(),
        }
    }
}

/// Definition of one progression phase.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhaseDef {
    pub number: u32,
    /// Objective text indices for the status line, by completion state.
    #[serde(default)]
    pub objective_start_index: usize,
    #[serde(default)]
    pub objective_leader_index: usize,
    #[serde(default)]
    pub objective_final_index: usize,
    #[serde(default)]
    pub objective_wait_index: usize,
    /// Neutral conversions needed to complete the phase; `None` for phases
    /// completed by other means.
    #[serde(default)]
    pub required_conversions: Option<u32>,
    /// Characters brought online when the phase begins.
    #[serde(default)]
    pub initial_active: Vec<String>,
    /// Gatekeeper surfaced once the objective is complete.
    #[serde(default)]
    pub leader: Option<String>,
}

/// What using an item does.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemEffect {
    /// One-shot-per-sector influence boost.
    SectorPing { influence_gain: f32 },
    /// Two-step full-trust grant on a neutral target.
    RootkitOverride,
    /// Toggle that dampens the adversary's attack chance.
    ModulatorToggle,
    /// Toggle that suppresses the adversary entirely.
    FirewallToggle,
}

/// One piece of software the player can hold and run.
#[derive(Debug, Clone, Deserialize)]
pub struct ItemDef {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub effect: ItemEffect,
}

/// Actions the dispatcher can route to. The catalog maps localized action
/// words onto these, so the command surface travels with the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandAction {
    NewGame,
    Help,
    ListContacts,
    ListFragments,
    ListInventory,
    Talk,
    Answer,
    Save,
    Load,
    OpenSettings,
    UseItem,
    ExitToMenu,
}

/// Adversary tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct IceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Base attack probability per free turn, in [0, 1].
    #[serde(default)]
    pub attack_chance: f64,
}

impl Default for IceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            attack_chance: 0.0,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_final_phase() -> u32 {
    6
}

/// Engine tuning carried by the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub ice: IceConfig,
    /// Phase at which endgame gating replaces the normal objectives.
    #[serde(default = "default_final_phase")]
    pub final_phase: u32,
    /// Character who anchors briefings and greets the player.
    #[serde(default)]
    pub guide_id: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ice: IceConfig::default(),
            final_phase: default_final_phase(),
            guide_id: String::new(),
        }
    }
}

/// Ending texts.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Endings {
    #[serde(default)]
    pub victory: String,
    #[serde(default)]
    pub defeat: String,
}

/// The full, immutable content catalog the engine plays from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentCatalog {
    #[serde(default)]
    pub phases: Vec<PhaseDef>,
    #[serde(default)]
    pub characters: BTreeMap<String, CharacterTemplate>,
    #[serde(default)]
    pub items: BTreeMap<String, ItemDef>,
    #[serde(default)]
    pub endings: Endings,
    /// Orientation lines shown once the player has named themself.
    #[serde(default)]
    pub intro_lines: Vec<String>,
    /// Objective texts indexed by the phase table.
    #[serde(default)]
    pub objectives: Vec<String>,
    /// Localized action word -> dispatcher action.
    #[serde(default)]
    pub commands: BTreeMap<String, CommandAction>,
    #[serde(default)]
    pub config: EngineConfig,
    #[serde(default)]
    pub strings: StringTable,
}

impl ContentCatalog {
    /// Parse a catalog from TOML and validate its cross-references.
    pub fn from_toml_str(input: &str) -> Result<Self, ContentError> {
        let catalog: ContentCatalog = toml::from_str(input)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check cross-references once so runtime lookups can fail silently.
    ///
    /// Dangling phase rosters, leaders, and the guide are hard errors; a
    /// dangling `next_node` only ends a conversation early, so it is
    /// reported as a diagnostic instead.
    pub fn validate(&self) -> Result<(), ContentError> {
        for phase in &self.phases {
            for id in phase.initial_active.iter().chain(phase.leader.iter()) {
                if !self.characters.contains_key(id) {
                    return Err(ContentError::UnknownCharacter {
                        phase: phase.number,
                        id: id.clone(),
                    });
                }
            }
        }

        if !self.config.guide_id.is_empty() && !self.characters.contains_key(&self.config.guide_id)
        {
            return Err(ContentError::UnknownGuide(self.config.guide_id.clone()));
        }

        for (id, template) in &self.characters {
            if let DialogueSet::Tree { nodes } = &template.dialogue {
                for (key, node) in nodes {
                    for option in &node.options {
                        if let Some(next) = &option.next_node {
                            if !nodes.contains_key(next) {
                                tracing::warn!(
                                    character = %id,
                                    node = %key,
                                    next = %next,
                                    "dialogue option points at a missing node"
                                );
                            }
                        }
                    }
                }
            }
        }

        Ok(())
    }

    /// Definition of phase `number`, if authored.
    pub fn phase(&self, number: u32) -> Option<&PhaseDef> {
        self.phases.iter().find(|p| p.number == number)
    }

    /// Stamp the full cast into a fresh pool of live records.
    pub fn instantiate_pool(&self) -> BTreeMap<String, CharacterRecord> {
        self.characters
            .iter()
            .map(|(id, template)| (id.clone(), template.instantiate()))
            .collect()
    }

    /// Objective line for the presentation layer's status area.
    pub fn objective_for(&self, state: &GameState, average_influence: f32) -> String {
        if state.game_over {
            return String::new();
        }
        let Some(def) = self.phase(state.current_phase) else {
            return self.strings.get("objectives.fallback");
        };
        let index = if state.current_phase < self.config.final_phase {
            if state.phase_objective_complete {
                def.objective_leader_index
            } else {
                def.objective_start_index
            }
        } else if average_influence > 80.0 {
            def.objective_final_index
        } else {
            def.objective_wait_index
        };
        self.objectives
            .get(index)
            .cloned()
            .unwrap_or_else(|| self.strings.get("objectives.fallback"))
    }

    /// Input prompt for the presentation layer.
    pub fn prompt_for(&self, state: &GameState) -> String {
        if state.pending_action.is_some() {
            return self.strings.get("ui.prompt_target");
        }
        if state.player_name == PENDING_NAME {
            return self.strings.get("ui.prompt_codename");
        }
        ">".to_string()
    }
}
