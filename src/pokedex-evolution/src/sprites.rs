//! Deterministic sprite URLs.

use crate::id::SpeciesId;

/// Host of the PokéAPI sprite repository.
pub const DEFAULT_SPRITE_BASE_URL: &str = "https://raw.githubusercontent.com/PokeAPI/sprites/master";

/// Front sprite of a species or form id.
pub fn sprite_url(base: &str, id: SpeciesId) -> String {
    format!("{}/sprites/pokemon/{}.png", base.trim_end_matches('/'), id)
}

/// Shiny front sprite of a species or form id.
pub fn shiny_sprite_url(base: &str, id: SpeciesId) -> String {
    format!("{}/sprites/pokemon/shiny/{}.png", base.trim_end_matches('/'), id)
}
