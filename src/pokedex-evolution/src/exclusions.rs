//! Regional-exclusive evolution table.
//!
//! PokéAPI lists evolutions that only a regional form can perform (Galarian
//! Meowth into Perrserker) on the base species' chain. This table names those
//! edges so the non-regional tree can drop them. It is data, not code: the
//! defaults can be extended from a TOML file or the resolver config.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvolutionResult};

const DEFAULT_EXCLUSIONS: &[(&str, &[&str])] = &[
    ("meowth", &["perrserker"]),
    ("corsola", &["cursola"]),
    ("farfetchd", &["sirfetchd"]),
    ("linoone", &["obstagoon"]),
    ("yamask", &["runerigus"]),
    ("mr-mime", &["mr-rime"]),
];

/// Parent species name -> children excluded from its non-regional tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionalExclusions {
    entries: BTreeMap<String, Vec<String>>,
}

#[derive(Deserialize)]
struct ExclusionsFile {
    #[serde(default)]
    exclusions: BTreeMap<String, Vec<String>>,
}

impl RegionalExclusions {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in Galar table.
    pub fn builtin() -> Self {
        let entries = DEFAULT_EXCLUSIONS
            .iter()
            .map(|(parent, children)| {
                (
                    (*parent).to_string(),
                    children.iter().map(|c| (*c).to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn from_map(entries: BTreeMap<String, Vec<String>>) -> Self {
        Self { entries }
    }

    /// Parse a TOML document with an `[exclusions]` table:
    ///
    /// ```toml
    /// [exclusions]
    /// qwilfish = ["overqwil"]
    /// ```
    pub fn from_toml_str(content: &str) -> EvolutionResult<Self> {
        let file: ExclusionsFile = toml::from_str(content)?;
        Ok(Self::from_map(file.exclusions))
    }

    pub fn load(path: impl AsRef<Path>) -> EvolutionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EvolutionError::Config {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Add every edge of `other`; existing edges are kept.
    pub fn merge(&mut self, other: &RegionalExclusions) {
        for (parent, children) in &other.entries {
            let list = self.entries.entry(parent.clone()).or_default();
            for child in children {
                if !list.contains(child) {
                    list.push(child.clone());
                }
            }
        }
    }

    pub fn insert(&mut self, parent: impl Into<String>, child: impl Into<String>) {
        let child = child.into();
        let list = self.entries.entry(parent.into()).or_default();
        if !list.contains(&child) {
            list.push(child);
        }
    }

    /// Whether `child` must be dropped from `parent`'s non-regional tree.
    pub fn excludes(&self, parent: &str, child: &str) -> bool {
        self.entries
            .get(parent)
            .is_some_and(|children| children.iter().any(|c| c == child))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(parent, children)| (parent.as_str(), children.as_slice()))
    }
}
