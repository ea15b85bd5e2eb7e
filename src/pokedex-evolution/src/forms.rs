//! Classification of alternate-form names.
//!
//! PokéAPI encodes form kinds only in the variety name (`raichu-alola`,
//! `charizard-mega-x`, `pikachu-rock-star`), so every check here is a
//! substring test on that name.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Name fragments of forms that only change appearance.
pub const COSMETIC_PATTERNS: &[&str] = &[
    "-totem",
    "-cosplay",
    "-rock-star",
    "-belle",
    "-pop-star",
    "-phd",
    "-libre",
    "-original-cap",
    "-hoenn-cap",
    "-sinnoh-cap",
    "-unova-cap",
    "-kalos-cap",
    "-alola-cap",
    "-partner-cap",
    "-world-cap",
    "-starter",
    "-own-tempo",
];

/// Regional variety names used for side-chain discovery.
static REGIONAL_VARIETY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"-(alola|galar|hisui|paldea)($|-)").expect("Invalid regional variety regex")
});

/// In-game region a form belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Alola,
    Galar,
    Hisui,
    Paldea,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Alola, Region::Galar, Region::Hisui, Region::Paldea];

    /// Name suffix PokéAPI uses for this region's forms.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Alola => "alola",
            Self::Galar => "galar",
            Self::Hisui => "hisui",
            Self::Paldea => "paldea",
        }
    }

    pub fn adjective(self) -> &'static str {
        match self {
            Self::Alola => "Alolan",
            Self::Galar => "Galarian",
            Self::Hisui => "Hisuian",
            Self::Paldea => "Paldean",
        }
    }

    /// Region of a form name, if it is a regional form.
    pub fn from_form_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| name.contains(&format!("-{}", region.suffix())))
    }

    /// Whether `variety` is this region's form of `species`
    /// (`meowth-galar`, `darmanitan-galar-standard`). Cosmetic forms such as
    /// `pikachu-alola-cap` never count.
    pub fn is_variety_of(self, variety: &str, species: &str) -> bool {
        is_valid_form(variety)
            && variety
                .strip_prefix(species)
                .and_then(|rest| rest.strip_prefix('-'))
                .and_then(|rest| rest.strip_prefix(self.suffix()))
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('-'))
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.suffix())
    }
}

pub fn is_regional_form(name: &str) -> bool {
    Region::from_form_name(name).is_some()
}

pub fn is_mega_evolution(name: &str) -> bool {
    name.contains("-mega")
}

/// Whether a form is worth listing (not cosmetic-only).
pub fn is_valid_form(name: &str) -> bool {
    !COSMETIC_PATTERNS.iter().any(|pattern| name.contains(pattern))
}

/// Stricter regional test used when listing a root species' variants.
pub fn is_regional_variety(name: &str) -> bool {
    REGIONAL_VARIETY.is_match(name)
}

/// Species name of a possibly regional form (`meowth-galar` -> `meowth`,
/// `darmanitan-galar-zen` -> `darmanitan`).
pub fn base_species_name(name: &str) -> &str {
    Region::ALL
        .into_iter()
        .filter_map(|region| name.find(&format!("-{}", region.suffix())))
        .min()
        .map_or(name, |at| &name[..at])
}

/// Human-readable label of a form relative to its base species.
pub fn format_form_name(full_name: &str, base_name: &str) -> String {
    if let Some(region) = Region::from_form_name(full_name) {
        return format!("{} Form", region.adjective());
    }

    let prefix = format!("{base_name}-");
    let stripped = full_name.replacen(&prefix, "", 1);

    if is_mega_evolution(full_name) {
        let mut chars = stripped.chars();
        return match chars.next() {
            Some(first) => {
                first.to_uppercase().collect::<String>() + &chars.as_str().replace('-', " ")
            }
            None => String::new(),
        };
    }

    stripped.replace('-', " ")
}
