//! PokéAPI response documents.
//!
//! Only the fields the resolver reads are modelled; everything else in the
//! upstream payloads is ignored. Missing arrays and objects default to empty
//! so that sparse fixtures and partially populated records still decode.

use serde::{Deserialize, Serialize};

/// A `{ name, url }` reference to another PokéAPI resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A bare `{ url }` reference, as used for `evolution_chain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResource {
    pub url: String,
}

/// `GET /pokemon-species/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeciesDetail {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub evolution_chain: Option<ApiResource>,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

impl SpeciesDetail {
    /// URL of the evolution-chain document, ignoring empty references.
    pub fn evolution_chain_url(&self) -> Option<&str> {
        self.evolution_chain
            .as_ref()
            .map(|chain| chain.url.as_str())
            .filter(|url| !url.is_empty())
    }
}

/// One entry of a species' `varieties` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Variety {
    #[serde(default)]
    pub is_default: bool,
    pub pokemon: NamedResource,
}

/// `GET /pokemon/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PokemonDetail {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub species: NamedResource,
}

impl PokemonDetail {
    /// Type names in slot order.
    pub fn type_names(&self) -> Vec<String> {
        let mut slots: Vec<&TypeSlot> = self.types.iter().collect();
        slots.sort_by_key(|slot| slot.slot);
        slots.into_iter().map(|slot| slot.kind.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeSlot {
    #[serde(default)]
    pub slot: u8,
    #[serde(rename = "type")]
    pub kind: NamedResource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sprites {
    #[serde(default)]
    pub front_default: Option<String>,
    #[serde(default)]
    pub front_shiny: Option<String>,
}

/// `GET /evolution-chain/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainDocument {
    #[serde(default)]
    pub id: u32,
    pub chain: ChainLink,
}

/// A node of the upstream evolution tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainLink {
    pub species: NamedResource,
    #[serde(default)]
    pub is_baby: bool,
    #[serde(default)]
    pub evolution_details: Vec<RawEvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

/// One alternate condition of an evolution edge, as PokéAPI ships it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEvolutionDetail {
    #[serde(default)]
    pub trigger: Option<NamedResource>,
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub item: Option<NamedResource>,
    #[serde(default)]
    pub known_move: Option<NamedResource>,
    #[serde(default)]
    pub time_of_day: Option<String>,
    #[serde(default)]
    pub min_happiness: Option<u32>,
    #[serde(default)]
    pub location: Option<NamedResource>,
    #[serde(default)]
    pub min_beauty: Option<u32>,
}
