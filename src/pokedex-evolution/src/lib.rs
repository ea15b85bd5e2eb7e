//! Evolution chain resolver for PokéAPI species data.
//!
//! Given a species and the Pokémon currently being viewed, the resolver
//! fetches the species' evolution chain and expands it into a tree of stages
//! annotated with types, alternate forms, sprites and evolution conditions.
//! A flattened pre-order projection and a radial-layout hint are produced
//! alongside the tree. Viewing a regional form (e.g. `meowth-galar`) yields
//! that form's own line instead.
//!
//! ```ignore
//! use pokedex_evolution::{EvolutionChainResolver, ResolverConfig, SpeciesId};
//!
//! let resolver = EvolutionChainResolver::from_config(&ResolverConfig::default())?;
//! let url = resolver.species_url("bulbasaur");
//! let (tree, flat) = resolver.resolve(&url, SpeciesId(1)).await.into_parts();
//! ```

pub mod api;
pub mod config;
mod context;
pub mod error;
pub mod exclusions;
mod expand;
pub mod fetch;
pub mod forms;
pub mod id;
pub mod layout;
pub mod model;
pub mod regional;
mod resolver;
pub mod sprites;

pub use config::{DEFAULT_API_BASE_URL, ResolverConfig};
pub use error::{EvolutionError, EvolutionResult};
pub use exclusions::RegionalExclusions;
pub use fetch::{CachedFetcher, HttpFetcher, JsonFetcher};
pub use forms::{
    Region, base_species_name, format_form_name, is_mega_evolution, is_regional_form, is_valid_form,
};
pub use id::SpeciesId;
pub use layout::{flatten, format_evolution_method, is_radial_family};
pub use model::{
    EvolutionDetails, EvolutionNode, FlatPokemon, PokemonForm, RegionalChain, Resolution,
    ResolvedChain,
};
pub use regional::{PokeApiRegionalSupplier, RegionalChainSupplier, adapt_regional_chain};
pub use resolver::EvolutionChainResolver;
pub use sprites::{DEFAULT_SPRITE_BASE_URL, shiny_sprite_url, sprite_url};
