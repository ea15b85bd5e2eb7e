//! Resolved evolution data handed to the rendering layer.

use serde::{Deserialize, Serialize};

use crate::api::RawEvolutionDetail;
use crate::forms::base_species_name;
use crate::id::SpeciesId;

/// How a parent stage reaches a child stage.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_move: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_of_day: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_happiness: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_beauty: Option<u32>,
}

impl From<&RawEvolutionDetail> for EvolutionDetails {
    fn from(raw: &RawEvolutionDetail) -> Self {
        let name = |resource: &Option<crate::api::NamedResource>| {
            resource
                .as_ref()
                .map(|r| r.name.clone())
                .filter(|n| !n.is_empty())
        };
        Self {
            trigger: name(&raw.trigger),
            min_level: raw.min_level,
            item: name(&raw.item),
            known_move: name(&raw.known_move),
            time_of_day: raw.time_of_day.clone().filter(|t| !t.is_empty()),
            min_happiness: raw.min_happiness,
            location: name(&raw.location),
            min_beauty: raw.min_beauty,
        }
    }
}

/// Alternate form of a species (mega, regional, gigantamax, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonForm {
    pub id: SpeciesId,
    pub name: String,
    pub display_name: String,
    pub types: Vec<String>,
    pub sprite: Option<String>,
    pub shiny_sprite: Option<String>,
    pub is_mega: bool,
    pub is_regional: bool,
    pub has_own_evolution: bool,
}

/// One stage of an evolution tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionNode {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<String>,
    #[serde(default)]
    pub forms: Vec<PokemonForm>,
    pub level: u32,
    pub parent_id: Option<SpeciesId>,
    pub sprite: String,
    pub shiny_sprite: String,
    #[serde(default)]
    pub evolutions: Vec<EvolutionNode>,
    /// Every alternate condition for the edge from the parent, in source
    /// order. Empty at the root.
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetails>,
    #[serde(default)]
    pub is_split_evolution: bool,
}

impl EvolutionNode {
    /// Primary condition for the edge from the parent.
    pub fn evolution_details(&self) -> Option<&EvolutionDetails> {
        self.evolution_details.first()
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Total number of stages in this subtree, including this one.
    pub fn stage_count(&self) -> usize {
        1 + self
            .evolutions
            .iter()
            .map(EvolutionNode::stage_count)
            .sum::<usize>()
    }

    /// Find a stage by species name anywhere in this subtree.
    pub fn find(&self, name: &str) -> Option<&EvolutionNode> {
        if self.name == name {
            return Some(self);
        }
        self.evolutions.iter().find_map(|child| child.find(name))
    }
}

/// Linear projection of an [`EvolutionNode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPokemon {
    pub id: SpeciesId,
    pub name: String,
    pub types: Vec<String>,
    #[serde(default)]
    pub forms: Vec<PokemonForm>,
    pub level: u32,
    pub sprite: String,
    pub shiny_sprite: String,
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evolution_method: Option<String>,
    #[serde(default)]
    pub is_split_evolution: bool,
}

/// A successfully resolved chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedChain {
    pub tree: EvolutionNode,
    pub flat: Vec<FlatPokemon>,
    /// The family should be drawn radially around its base stage.
    pub radial_layout: bool,
}

impl ResolvedChain {
    /// Species at the root of the family, with any regional suffix removed
    /// (`meowth-galar` -> `meowth`).
    pub fn root_species_name(&self) -> &str {
        base_species_name(&self.tree.name)
    }
}

/// Outcome of [`crate::EvolutionChainResolver::resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    /// The species has no evolution chain.
    NotEvolving,
    /// The species detail or chain document could not be loaded.
    FetchError { message: String },
    /// The caller cancelled before the tree was complete.
    Cancelled,
    Resolved(ResolvedChain),
}

impl Resolution {
    pub fn fetch_error(message: impl Into<String>) -> Self {
        Self::FetchError {
            message: message.into(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    pub fn chain(&self) -> Option<&ResolvedChain> {
        match self {
            Self::Resolved(chain) => Some(chain),
            _ => None,
        }
    }

    /// Collapse into the `(tree, flat)` pair; every unresolved outcome is
    /// `(None, [])`.
    pub fn into_parts(self) -> (Option<EvolutionNode>, Vec<FlatPokemon>) {
        match self {
            Self::Resolved(chain) => (Some(chain.tree), chain.flat),
            _ => (None, Vec::new()),
        }
    }
}

/// Evolution line of one regional variant of a root species.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalChain {
    pub variant: String,
    pub chain: Vec<FlatPokemon>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NamedResource;

    #[test]
    fn test_details_from_raw_drops_empty_values() {
        let raw = RawEvolutionDetail {
            trigger: Some(NamedResource {
                name: "use-item".into(),
                url: String::new(),
            }),
            item: Some(NamedResource {
                name: "water-stone".into(),
                url: String::new(),
            }),
            time_of_day: Some(String::new()),
            ..Default::default()
        };
        let details = EvolutionDetails::from(&raw);
        assert_eq!(details.trigger.as_deref(), Some("use-item"));
        assert_eq!(details.item.as_deref(), Some("water-stone"));
        assert!(details.time_of_day.is_none());
        assert!(details.min_level.is_none());
    }

    #[test]
    fn test_unresolved_outcomes_collapse_to_empty() {
        for outcome in [
            Resolution::NotEvolving,
            Resolution::fetch_error("boom"),
            Resolution::Cancelled,
        ] {
            assert!(!outcome.is_resolved());
            let (tree, flat) = outcome.into_parts();
            assert!(tree.is_none());
            assert!(flat.is_empty());
        }
    }

    #[test]
    fn test_resolution_serializes_with_status_tag() {
        let json = serde_json::to_value(Resolution::fetch_error("timeout")).unwrap();
        assert_eq!(json["status"], "fetch_error");
        assert_eq!(json["message"], "timeout");
    }
}
