//! Evolution chain resolution.

use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::api::{ChainDocument, PokemonDetail, SpeciesDetail};
use crate::config::ResolverConfig;
use crate::context::FetchContext;
use crate::error::{EvolutionError, EvolutionResult};
use crate::exclusions::RegionalExclusions;
use crate::expand::ChainExpander;
use crate::fetch::{CachedFetcher, HttpFetcher, JsonFetcher};
use crate::forms::{is_regional_form, is_regional_variety, is_valid_form};
use crate::id::SpeciesId;
use crate::layout::{flatten, is_radial_family};
use crate::model::{RegionalChain, ResolvedChain, Resolution};
use crate::regional::{PokeApiRegionalSupplier, RegionalChainSupplier, adapt_regional_chain};

/// Resolves species into evolution trees.
///
/// Cheap to clone; clones share the fetcher, supplier and exclusion table.
#[derive(Clone)]
pub struct EvolutionChainResolver {
    ctx: FetchContext,
    exclusions: Arc<RegionalExclusions>,
    supplier: Arc<dyn RegionalChainSupplier>,
}

impl EvolutionChainResolver {
    /// Build a resolver over `fetcher`, using the PokéAPI regional supplier.
    pub fn new(fetcher: Arc<dyn JsonFetcher>, config: &ResolverConfig) -> EvolutionResult<Self> {
        let ctx = FetchContext::new(fetcher, config);
        let exclusions = Arc::new(config.effective_exclusions()?);
        let supplier = Arc::new(PokeApiRegionalSupplier::new(ctx.clone(), exclusions.clone()));
        Ok(Self {
            ctx,
            exclusions,
            supplier,
        })
    }

    /// Build a resolver with an HTTP fetcher (cached when
    /// `cache_capacity > 0`).
    pub fn from_config(config: &ResolverConfig) -> EvolutionResult<Self> {
        let http = HttpFetcher::new(Duration::from_secs(config.request_timeout_secs))?;
        let fetcher: Arc<dyn JsonFetcher> = if config.cache_capacity > 0 {
            Arc::new(CachedFetcher::new(http, config.cache_capacity))
        } else {
            Arc::new(http)
        };
        Self::new(fetcher, config)
    }

    /// Replace the regional chain supplier.
    pub fn with_supplier(mut self, supplier: Arc<dyn RegionalChainSupplier>) -> Self {
        self.supplier = supplier;
        self
    }

    pub fn exclusions(&self) -> &RegionalExclusions {
        &self.exclusions
    }

    /// `{api}/pokemon-species/{key}`
    pub fn species_url(&self, key: impl Display) -> String {
        self.ctx.species_url(key)
    }

    /// Look up a Pokémon by name or id.
    pub async fn lookup_pokemon(&self, key: &str) -> EvolutionResult<PokemonDetail> {
        self.ctx.get(&self.ctx.pokemon_url(key)).await
    }

    /// Look up a species by name or id.
    pub async fn lookup_species(&self, key: &str) -> EvolutionResult<SpeciesDetail> {
        self.ctx.get(&self.ctx.species_url(key)).await
    }

    /// Resolve the chain of the species at `species_url`.
    ///
    /// `current` is the Pokémon being viewed; when it is a regional form the
    /// regional line is returned instead of the species' default chain.
    pub async fn resolve(&self, species_url: &str, current: SpeciesId) -> Resolution {
        self.resolve_with_cancel(species_url, current, &CancellationToken::new())
            .await
    }

    /// [`Self::resolve`] with cooperative cancellation.
    pub async fn resolve_with_cancel(
        &self,
        species_url: &str,
        current: SpeciesId,
        cancel: &CancellationToken,
    ) -> Resolution {
        let species: SpeciesDetail = match self.ctx.get(species_url).await {
            Ok(species) => species,
            Err(e) => {
                warn!(url = %species_url, error = %e, "Failed to fetch species detail");
                return Resolution::fetch_error(e.to_string());
            }
        };

        let Some(chain_url) = species.evolution_chain_url() else {
            info!(species = %species.name, %current, "No evolution chain");
            return Resolution::NotEvolving;
        };

        if cancel.is_cancelled() {
            return Resolution::Cancelled;
        }

        if let Some(resolved) = self.resolve_regional_current(current).await {
            info!(root = %resolved.tree.name, stages = resolved.flat.len(), "Resolved regional chain");
            return Resolution::Resolved(resolved);
        }

        let document: ChainDocument = match self.ctx.get(chain_url).await {
            Ok(document) => document,
            Err(e) => {
                warn!(url = %chain_url, error = %e, "Failed to fetch evolution chain");
                return Resolution::fetch_error(e.to_string());
            }
        };

        let expander = ChainExpander::new(&self.ctx, &self.exclusions);
        let tree = match expander.expand(&document.chain, cancel).await {
            Ok(tree) => tree,
            Err(EvolutionError::Cancelled) => return Resolution::Cancelled,
            Err(e) => {
                warn!(url = %chain_url, error = %e, "Failed to expand evolution chain");
                return Resolution::fetch_error(e.to_string());
            }
        };

        let flat = flatten(&tree);
        let radial_layout = is_radial_family(&flat);
        info!(root = %tree.name, stages = flat.len(), radial_layout, "Resolved evolution chain");

        Resolution::Resolved(ResolvedChain {
            tree,
            flat,
            radial_layout,
        })
    }

    /// Regional line of the viewed Pokémon, when it is a regional form with
    /// a non-empty line. Any failure falls back to the default chain.
    async fn resolve_regional_current(&self, current: SpeciesId) -> Option<ResolvedChain> {
        let pokemon = match self.lookup_pokemon(&current.to_string()).await {
            Ok(pokemon) => pokemon,
            Err(e) => {
                warn!(%current, error = %e, "Failed to look up viewed Pokémon");
                return None;
            }
        };

        if !is_regional_form(&pokemon.name) {
            return None;
        }

        let chain = match self.supplier.regional_chain(&pokemon.name).await {
            Ok(chain) => chain,
            Err(e) => {
                warn!(variant = %pokemon.name, error = %e, "Regional chain supplier failed");
                return None;
            }
        };

        let tree = adapt_regional_chain(&chain)?;
        let radial_layout = is_radial_family(&chain);
        Some(ResolvedChain {
            tree,
            flat: chain,
            radial_layout,
        })
    }

    /// Regional varieties of a root species (`meowth` -> `meowth-alola`,
    /// `meowth-galar`). Empty on failure.
    pub async fn detect_regional_variants(&self, root_name: &str) -> Vec<String> {
        let species = match self.lookup_species(root_name).await {
            Ok(species) => species,
            Err(e) => {
                warn!(species = %root_name, error = %e, "Failed to check for regional variants");
                return Vec::new();
            }
        };

        if species.varieties.len() <= 1 {
            return Vec::new();
        }

        let variants: Vec<String> = species
            .varieties
            .into_iter()
            .filter(|v| !v.is_default)
            .map(|v| v.pokemon.name)
            .filter(|name| is_regional_variety(name) && is_valid_form(name))
            .collect();

        debug!(species = %root_name, ?variants, "Detected regional variants");
        variants
    }

    /// Lines for each variant, in order. Variants without a line, or whose
    /// lookup fails, are skipped.
    pub async fn resolve_variant_chains(&self, variants: &[String]) -> Vec<RegionalChain> {
        let mut chains = Vec::new();

        for variant in variants {
            match self.supplier.regional_chain(variant).await {
                Ok(chain) if !chain.is_empty() => chains.push(RegionalChain {
                    variant: variant.clone(),
                    chain,
                }),
                Ok(_) => debug!(%variant, "Variant has no distinct line"),
                Err(e) => warn!(%variant, error = %e, "Failed to load regional chain"),
            }
        }

        chains
    }

    /// Detect and resolve the root's regional side-chains in the background.
    pub fn spawn_variant_discovery(&self, root_name: impl Into<String>) -> JoinHandle<Vec<RegionalChain>> {
        let resolver = self.clone();
        let root_name = root_name.into();
        tokio::spawn(async move {
            let variants = resolver.detect_regional_variants(&root_name).await;
            resolver.resolve_variant_chains(&variants).await
        })
    }
}
