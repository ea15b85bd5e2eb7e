//! Shared fetch context for the expander and the regional supplier.

use std::fmt::Display;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::warn;

use crate::api::PokemonDetail;
use crate::config::ResolverConfig;
use crate::error::{EvolutionError, EvolutionResult};
use crate::fetch::{JsonFetcher, fetch_typed};
use crate::id::SpeciesId;

/// Fetcher, endpoints and the concurrency bound shared by every clone of
/// one resolver.
#[derive(Clone)]
pub struct FetchContext {
    fetcher: Arc<dyn JsonFetcher>,
    api_base: String,
    sprite_base: String,
    limiter: Arc<Semaphore>,
}

impl FetchContext {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &ResolverConfig) -> Self {
        Self {
            fetcher,
            api_base: config.api_base().to_string(),
            sprite_base: config.sprite_base_url.clone(),
            limiter: Arc::new(Semaphore::new(config.concurrency())),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn sprite_base(&self) -> &str {
        &self.sprite_base
    }

    pub fn fetcher(&self) -> &Arc<dyn JsonFetcher> {
        &self.fetcher
    }

    /// `{api}/pokemon/{id or name}`
    pub fn pokemon_url(&self, key: impl Display) -> String {
        format!("{}/pokemon/{}", self.api_base, key)
    }

    /// `{api}/pokemon-species/{id or name}`
    pub fn species_url(&self, key: impl Display) -> String {
        format!("{}/pokemon-species/{}", self.api_base, key)
    }

    /// Fetch and decode while holding one concurrency permit.
    pub async fn get<T: DeserializeOwned>(&self, url: &str) -> EvolutionResult<T> {
        let _permit = self.limiter.acquire().await.map_err(|_| {
            EvolutionError::Internal("fetch limiter semaphore closed unexpectedly".into())
        })?;
        fetch_typed(self.fetcher.as_ref(), url).await
    }

    /// Types of a Pokémon in slot order; empty when the lookup fails.
    pub async fn types_or_empty(&self, id: SpeciesId) -> Vec<String> {
        match self.get::<PokemonDetail>(&self.pokemon_url(id)).await {
            Ok(pokemon) => pokemon.type_names(),
            Err(e) => {
                warn!(%id, error = %e, "Failed to fetch types, continuing without them");
                Vec::new()
            }
        }
    }
}
