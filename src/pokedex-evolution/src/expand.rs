//! Breadth-first expansion of an evolution-chain document.
//!
//! Links are expanded one level at a time from an explicit queue. Every link
//! of a level is enriched concurrently (bounded by the context's semaphore)
//! and the results are written into an arena in source order. The owned tree
//! is assembled from the arena once the queue drains.

use std::collections::HashMap;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::api::{ChainLink, PokemonDetail, SpeciesDetail, Variety};
use crate::context::FetchContext;
use crate::error::{EvolutionError, EvolutionResult};
use crate::exclusions::RegionalExclusions;
use crate::forms::{format_form_name, is_mega_evolution, is_regional_form, is_valid_form};
use crate::id::SpeciesId;
use crate::model::{EvolutionDetails, EvolutionNode, PokemonForm};
use crate::sprites::{shiny_sprite_url, sprite_url};

/// A link waiting in the queue.
struct PendingLink<'d> {
    link: &'d ChainLink,
    parent: Option<usize>,
    level: u32,
}

struct ArenaEntry {
    node: EvolutionNode,
    children: Vec<usize>,
}

/// Expands chain documents into [`EvolutionNode`] trees.
pub struct ChainExpander<'a> {
    ctx: &'a FetchContext,
    exclusions: &'a RegionalExclusions,
}

impl<'a> ChainExpander<'a> {
    pub fn new(ctx: &'a FetchContext, exclusions: &'a RegionalExclusions) -> Self {
        Self { ctx, exclusions }
    }

    /// Expand `root` into a tree.
    ///
    /// Fails only when the root link carries no usable species id or when
    /// `cancel` fires between levels. Enrichment failures leave empty
    /// `types`/`forms` on the affected node.
    pub async fn expand(
        &self,
        root: &ChainLink,
        cancel: &CancellationToken,
    ) -> EvolutionResult<EvolutionNode> {
        SpeciesId::from_url(&root.species.url)?;

        let mut arena: Vec<ArenaEntry> = Vec::new();
        let mut queue = vec![PendingLink {
            link: root,
            parent: None,
            level: 0,
        }];

        while !queue.is_empty() {
            if cancel.is_cancelled() {
                debug!(expanded = arena.len(), "Expansion cancelled");
                return Err(EvolutionError::Cancelled);
            }

            let level: Vec<(PendingLink<'_>, SpeciesId)> = queue
                .drain(..)
                .filter_map(|pending| match SpeciesId::from_url(&pending.link.species.url) {
                    Ok(id) => Some((pending, id)),
                    Err(e) => {
                        warn!(species = %pending.link.species.name, error = %e, "Dropping link without species id");
                        None
                    }
                })
                .collect();

            debug!(
                depth = ?level.first().map(|(p, _)| p.level),
                links = level.len(),
                "Expanding level"
            );

            let enriched = join_all(
                level
                    .iter()
                    .map(|(pending, id)| self.enrich(*id, pending.link)),
            )
            .await;

            for ((pending, id), (types, forms)) in level.into_iter().zip(enriched) {
                let index = arena.len();
                let parent_id = pending.parent.map(|p| arena[p].node.id);

                arena.push(ArenaEntry {
                    node: EvolutionNode {
                        id,
                        name: pending.link.species.name.clone(),
                        types,
                        forms,
                        level: pending.level,
                        parent_id,
                        sprite: sprite_url(self.ctx.sprite_base(), id),
                        shiny_sprite: shiny_sprite_url(self.ctx.sprite_base(), id),
                        evolutions: Vec::new(),
                        evolution_details: if pending.parent.is_some() {
                            pending
                                .link
                                .evolution_details
                                .iter()
                                .map(EvolutionDetails::from)
                                .collect()
                        } else {
                            Vec::new()
                        },
                        is_split_evolution: false,
                    },
                    children: Vec::new(),
                });
                if let Some(parent) = pending.parent {
                    arena[parent].children.push(index);
                }

                let parent_name = &pending.link.species.name;
                for child in &pending.link.evolves_to {
                    if self.exclusions.excludes(parent_name, &child.species.name) {
                        debug!(parent = %parent_name, child = %child.species.name, "Skipping regional-exclusive evolution");
                        continue;
                    }
                    queue.push(PendingLink {
                        link: child,
                        parent: Some(index),
                        level: pending.level + 1,
                    });
                }
            }
        }

        assemble(arena).ok_or_else(|| {
            EvolutionError::Internal("expansion produced no root node".into())
        })
    }

    /// Types and forms for one stage. The two lookups fail independently.
    async fn enrich(&self, id: SpeciesId, link: &ChainLink) -> (Vec<String>, Vec<PokemonForm>) {
        tokio::join!(
            self.ctx.types_or_empty(id),
            self.forms_or_empty(&link.species.url, &link.species.name)
        )
    }

    async fn forms_or_empty(&self, species_url: &str, base_name: &str) -> Vec<PokemonForm> {
        let species: SpeciesDetail = match self.ctx.get(species_url).await {
            Ok(species) => species,
            Err(e) => {
                warn!(species = %base_name, error = %e, "Failed to fetch varieties, continuing without forms");
                return Vec::new();
            }
        };

        if species.varieties.len() <= 1 {
            return Vec::new();
        }

        let candidates: Vec<&Variety> = species
            .varieties
            .iter()
            .filter(|v| {
                let name = &v.pokemon.name;
                !v.is_default || is_regional_form(name) || is_mega_evolution(name)
            })
            .filter(|v| is_valid_form(&v.pokemon.name))
            .collect();

        join_all(
            candidates
                .into_iter()
                .map(|variety| self.form(variety, base_name)),
        )
        .await
        .into_iter()
        .flatten()
        .collect()
    }

    async fn form(&self, variety: &Variety, base_name: &str) -> Option<PokemonForm> {
        let name = &variety.pokemon.name;
        let detail: PokemonDetail = match self.ctx.get(&variety.pokemon.url).await {
            Ok(detail) => detail,
            Err(e) => {
                debug!(form = %name, error = %e, "Dropping form");
                return None;
            }
        };

        let is_regional = is_regional_form(name);
        Some(PokemonForm {
            id: SpeciesId(detail.id),
            name: name.clone(),
            display_name: format_form_name(name, base_name),
            types: detail.type_names(),
            sprite: detail.sprites.front_default,
            shiny_sprite: detail.sprites.front_shiny,
            is_mega: is_mega_evolution(name),
            is_regional,
            has_own_evolution: is_regional,
        })
    }
}

/// Build the owned tree. Children always sit at higher indices than their
/// parent, so a reverse sweep sees every child before its parent.
fn assemble(mut arena: Vec<ArenaEntry>) -> Option<EvolutionNode> {
    let mut built: HashMap<usize, EvolutionNode> = HashMap::with_capacity(arena.len());

    while let Some(entry) = arena.pop() {
        let index = arena.len();
        let mut node = entry.node;
        node.evolutions = entry
            .children
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();
        built.insert(index, node);
    }

    built.remove(&0)
}
