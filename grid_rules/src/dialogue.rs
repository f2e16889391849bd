//! Dialogue content structures.
//!
//! Everything here is authored data: the engine walks these records but
//! never invents them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The dialogue content attached to a character.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DialogueSet {
    /// Free-form small talk for neutral characters: one line is drawn
    /// uniformly from each pool per conversation.
    AdLib {
        openers: Vec<String>,
        player_lines: Vec<AdLibLine>,
        closers: Vec<String>,
    },
    /// A keyed node tree, walked deterministically for every other kind.
    Tree { nodes: BTreeMap<String, DialogueNode> },
}

impl DialogueSet {
    /// Look up a tree node by key. Ad-lib sets have no nodes.
    pub fn node(&self, key: &str) -> Option<&DialogueNode> {
        match self {
            DialogueSet::Tree { nodes } => nodes.get(key),
            DialogueSet::AdLib { .. } => None,
        }
    }
}

/// A player line in an ad-lib pool, carrying its trust payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdLibLine {
    pub text: String,
    #[serde(default)]
    pub trust_effect: f32,
}

/// A single node in a fixed dialogue tree. An empty `text` marks the node
/// as unusable, which ends the conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueNode {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub options: Vec<DialogueOption>,
}

/// One selectable option on a dialogue node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DialogueOption {
    pub text: String,
    #[serde(default)]
    pub trust_effect: f32,
    /// Item granted to the player's inventory on pick.
    #[serde(default)]
    pub grants_item: Option<String>,
    /// Key fragment granted on pick (ignored if already held).
    #[serde(default)]
    pub grants_fragment: Option<String>,
    /// Fragment the player must hold for the option text to be shown.
    #[serde(default)]
    pub requires_fragment: Option<String>,
    /// Node the conversation continues on, if it exists.
    #[serde(default)]
    pub next_node: Option<String>,
    /// Picking this option wins the game once the follow-up has played.
    #[serde(default)]
    pub victory: bool,
}
