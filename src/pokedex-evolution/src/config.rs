//! Resolver configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EvolutionError, EvolutionResult};
use crate::exclusions::RegionalExclusions;
use crate::sprites::DEFAULT_SPRITE_BASE_URL;

/// Default PokéAPI endpoint.
pub const DEFAULT_API_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Configuration for [`crate::EvolutionChainResolver`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// PokéAPI base URL, without trailing slash.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Sprite repository base URL.
    #[serde(default = "default_sprite_base_url")]
    pub sprite_base_url: String,

    /// Upper bound on in-flight requests during expansion.
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Number of responses kept by the fetch cache (0 disables it).
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,

    /// Extra exclusion edges merged over the built-in table.
    #[serde(default)]
    pub exclusions: BTreeMap<String, Vec<String>>,

    /// TOML file with an `[exclusions]` table, merged last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions_path: Option<PathBuf>,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_sprite_base_url() -> String {
    DEFAULT_SPRITE_BASE_URL.to_string()
}

fn default_max_concurrent_fetches() -> usize {
    4
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_cache_capacity() -> usize {
    256
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            sprite_base_url: default_sprite_base_url(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
            request_timeout_secs: default_request_timeout_secs(),
            cache_capacity: default_cache_capacity(),
            exclusions: BTreeMap::new(),
            exclusions_path: None,
        }
    }
}

impl ResolverConfig {
    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> EvolutionResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| EvolutionError::Config {
            message: format!("{}: {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> EvolutionResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Defaults overridden by `POKEDEX_*` environment variables.
    pub fn from_env() -> EvolutionResult<Self> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> EvolutionResult<()> {
        if let Some(url) = var("POKEDEX_API_BASE_URL") {
            self.api_base_url = url;
        }

        if let Some(url) = var("POKEDEX_SPRITE_BASE_URL") {
            self.sprite_base_url = url;
        }

        if let Some(value) = var("POKEDEX_MAX_CONCURRENT_FETCHES") {
            self.max_concurrent_fetches = parse_env("POKEDEX_MAX_CONCURRENT_FETCHES", &value)?;
        }

        if let Some(value) = var("POKEDEX_REQUEST_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("POKEDEX_REQUEST_TIMEOUT_SECS", &value)?;
        }

        if let Some(path) = var("POKEDEX_EXCLUSIONS_PATH") {
            self.exclusions_path = Some(PathBuf::from(path));
        }

        Ok(())
    }

    /// API base URL without trailing slash.
    pub fn api_base(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    /// Concurrency bound, never zero.
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_fetches.max(1)
    }

    /// Built-in table, then inline entries, then the exclusions file.
    pub fn effective_exclusions(&self) -> EvolutionResult<RegionalExclusions> {
        let mut table = RegionalExclusions::builtin();
        table.merge(&RegionalExclusions::from_map(self.exclusions.clone()));

        if let Some(path) = &self.exclusions_path {
            table.merge(&RegionalExclusions::load(path)?);
        }

        Ok(table)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> EvolutionResult<T> {
    value.trim().parse().map_err(|_| EvolutionError::Config {
        message: format!("{key} has invalid value '{value}'"),
    })
}
