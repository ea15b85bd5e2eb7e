//! Species arguments: a name, a numeric id or a full species URL.

use std::str::FromStr;

use pokedex_evolution::SpeciesId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeciesArg {
    Id(SpeciesId),
    Name(String),
    Url { url: String, id: SpeciesId },
}

impl SpeciesArg {
    /// Key accepted by the `pokemon-species/{key}` endpoint.
    pub fn lookup_key(&self) -> String {
        match self {
            Self::Id(id) | Self::Url { id, .. } => id.to_string(),
            Self::Name(name) => name.clone(),
        }
    }
}

impl FromStr for SpeciesArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("species must not be empty".to_string());
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            let id = SpeciesId::from_url(s).map_err(|e| e.to_string())?;
            return Ok(Self::Url {
                url: s.to_string(),
                id,
            });
        }

        match s.parse::<SpeciesId>() {
            Ok(id) if id.get() > 0 => Ok(Self::Id(id)),
            Ok(_) => Err(format!("Invalid species id '{s}'")),
            Err(_) => Ok(Self::Name(s.to_lowercase())),
        }
    }
}
