//! Localized string table with dotted-path lookup.
//!
//! The core never hardcodes player-facing prose: every message is resolved
//! through this table, which the content catalog supplies per language.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

/// Flattened localization table: nested tables become dotted keys
/// ("system.objective_complete"), values carry positional `{0}`, `{1}`...
/// placeholders.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    entries: BTreeMap<String, String>,
}

impl StringTable {
    /// Build a table from flat key/value pairs (mostly useful in tests).
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Insert or replace one entry.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Raw lookup. Falls back to echoing the key so a missing translation
    /// never hides the event; the gap is reported through diagnostics.
    pub fn get(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => {
                tracing::warn!(key, "missing string table entry");
                key.to_string()
            }
        }
    }

    /// Lookup with positional `{n}` substitution.
    pub fn format(&self, key: &str, args: &[&str]) -> String {
        let mut out = self.get(key);
        for (i, arg) in args.iter().enumerate() {
            out = out.replace(&format!("{{{i}}}"), arg);
        }
        out
    }

    /// Number of entries loaded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'de> Deserialize<'de> for StringTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = toml::Value::deserialize(deserializer)?;
        let mut entries = BTreeMap::new();
        flatten("", &value, &mut entries);
        Ok(Self { entries })
    }
}

fn flatten(prefix: &str, value: &toml::Value, out: &mut BTreeMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, child) in table {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(&path, child, out);
            }
        }
        toml::Value::String(text) => {
            out.insert(prefix.to_string(), text.clone());
        }
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
