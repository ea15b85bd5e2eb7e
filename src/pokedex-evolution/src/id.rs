//! Canonical PokéAPI resource identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvolutionResult};

/// Numeric id of a PokéAPI species or Pokémon resource.
///
/// Ids are normalized to integers where they first enter the system, either
/// from a resource URL or from a numeric JSON field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u32);

impl SpeciesId {
    pub fn get(self) -> u32 {
        self.0
    }

    /// Extract the id from a resource URL such as
    /// `https://pokeapi.co/api/v2/pokemon-species/25/`.
    pub fn from_url(url: &str) -> EvolutionResult<Self> {
        url.trim_end_matches('/')
            .rsplit('/')
            .next()
            .and_then(|segment| segment.parse::<u32>().ok())
            .filter(|id| *id > 0)
            .map(SpeciesId)
            .ok_or_else(|| EvolutionError::InvalidResourceUrl {
                url: url.to_string(),
            })
    }
}

impl fmt::Display for SpeciesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SpeciesId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl FromStr for SpeciesId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SpeciesId)
    }
}
