//! Regional-variant evolution lines.
//!
//! A regional line is the part of a species' chain that a regional form
//! actually walks: stages that have a variety for the region (Galarian
//! Zigzagoon, Galarian Linoone) plus regional-exclusive evolutions listed in
//! the exclusion table (Obstagoon). The line is returned linearized, with
//! split evolutions flagged, in the same shape the rendering layer uses for
//! flattened chains.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::{debug, warn};

use crate::api::{ChainDocument, ChainLink, PokemonDetail, SpeciesDetail, Variety};
use crate::context::FetchContext;
use crate::error::{EvolutionError, EvolutionResult};
use crate::exclusions::RegionalExclusions;
use crate::forms::Region;
use crate::id::SpeciesId;
use crate::layout::format_evolution_method;
use crate::model::{EvolutionDetails, EvolutionNode, FlatPokemon};
use crate::sprites::{shiny_sprite_url, sprite_url};

/// Supplies the linearized evolution line of a regional form.
#[async_trait]
pub trait RegionalChainSupplier: Send + Sync {
    /// Chain for `variant_name` (e.g. `slowpoke-galar`). Empty when the
    /// variant has no distinct line.
    async fn regional_chain(&self, variant_name: &str) -> EvolutionResult<Vec<FlatPokemon>>;
}

/// [`RegionalChainSupplier`] that derives lines from PokéAPI chain documents.
pub struct PokeApiRegionalSupplier {
    ctx: FetchContext,
    exclusions: Arc<RegionalExclusions>,
}

/// Pre-order view of a chain document.
struct ChainEntry<'d> {
    link: &'d ChainLink,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Stage {
    index: usize,
    level: u32,
    split: bool,
}

impl PokeApiRegionalSupplier {
    pub fn new(ctx: FetchContext, exclusions: Arc<RegionalExclusions>) -> Self {
        Self { ctx, exclusions }
    }

    /// This region's variety of the stage's species, if it has one.
    async fn regional_variety(&self, link: &ChainLink, region: Region) -> Option<Variety> {
        let species: SpeciesDetail = match self.ctx.get(&link.species.url).await {
            Ok(species) => species,
            Err(e) => {
                warn!(species = %link.species.name, error = %e, "Failed to fetch varieties");
                return None;
            }
        };

        species
            .varieties
            .into_iter()
            .find(|v| region.is_variety_of(&v.pokemon.name, &link.species.name))
    }

    /// Which entries belong to the regional line, ancestors included.
    fn regional_line(&self, entries: &[ChainEntry<'_>], varieties: &[Option<Variety>]) -> Vec<bool> {
        let has_variety: Vec<bool> = varieties.iter().map(Option::is_some).collect();
        let mut included = has_variety.clone();

        for (index, entry) in entries.iter().enumerate() {
            let Some(parent_index) = entry.parent else {
                continue;
            };
            let parent = &entries[parent_index];
            // An exclusive evolution belongs to this region only when no
            // sibling has a form of its own here (Alolan Meowth -> Persian,
            // not Perrserker).
            let sibling_has_variety = parent.children.iter().any(|c| has_variety[*c]);
            if !sibling_has_variety
                && self
                    .exclusions
                    .excludes(&parent.link.species.name, &entry.link.species.name)
            {
                included[index] = true;
            }
        }

        for index in (0..entries.len()).rev() {
            if included[index]
                && let Some(parent) = entries[index].parent
            {
                included[parent] = true;
            }
        }

        included
    }

    async fn stage(
        &self,
        entry: &ChainEntry<'_>,
        variety: Option<&Variety>,
        stage: Stage,
    ) -> Option<FlatPokemon> {
        let (url, name) = match variety {
            Some(v) => (&v.pokemon.url, &v.pokemon.name),
            None => (&entry.link.species.url, &entry.link.species.name),
        };
        let id = match SpeciesId::from_url(url) {
            Ok(id) => id,
            Err(e) => {
                warn!(stage = %name, error = %e, "Dropping regional stage without id");
                return None;
            }
        };

        let evolution_details: Vec<EvolutionDetails> = if stage.level > 0 {
            entry
                .link
                .evolution_details
                .iter()
                .map(EvolutionDetails::from)
                .collect()
        } else {
            Vec::new()
        };

        Some(FlatPokemon {
            id,
            name: name.clone(),
            types: self.ctx.types_or_empty(id).await,
            forms: Vec::new(),
            level: stage.level,
            sprite: sprite_url(self.ctx.sprite_base(), id),
            shiny_sprite: shiny_sprite_url(self.ctx.sprite_base(), id),
            evolution_method: evolution_details.first().map(format_evolution_method),
            evolution_details,
            is_split_evolution: stage.split,
        })
    }
}

#[async_trait]
impl RegionalChainSupplier for PokeApiRegionalSupplier {
    async fn regional_chain(&self, variant_name: &str) -> EvolutionResult<Vec<FlatPokemon>> {
        let region =
            Region::from_form_name(variant_name).ok_or_else(|| EvolutionError::NotRegional {
                name: variant_name.to_string(),
            })?;

        let pokemon: PokemonDetail = self.ctx.get(&self.ctx.pokemon_url(variant_name)).await?;
        let species: SpeciesDetail = self.ctx.get(&pokemon.species.url).await?;
        let Some(chain_url) = species.evolution_chain_url() else {
            return Ok(Vec::new());
        };
        let document: ChainDocument = self.ctx.get(chain_url).await?;

        let entries = index_chain(&document.chain);
        let varieties: Vec<Option<Variety>> = join_all(
            entries
                .iter()
                .map(|entry| self.regional_variety(entry.link, region)),
        )
        .await;

        let included = self.regional_line(&entries, &varieties);
        if !included.first().copied().unwrap_or(false) {
            debug!(variant = %variant_name, "No regional line found");
            return Ok(Vec::new());
        }

        let mut stages = Vec::new();
        collect_stages(&entries, &included, 0, 0, false, &mut stages);

        let chain = join_all(
            stages
                .iter()
                .map(|s| self.stage(&entries[s.index], varieties[s.index].as_ref(), *s)),
        )
        .await
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        debug!(variant = %variant_name, stages = chain.len(), "Resolved regional line");
        Ok(chain)
    }
}

/// Flatten a chain document pre-order, recording parent/child indices.
fn index_chain(root: &ChainLink) -> Vec<ChainEntry<'_>> {
    let mut entries: Vec<ChainEntry<'_>> = Vec::new();
    let mut stack: Vec<(&ChainLink, Option<usize>)> = vec![(root, None)];

    while let Some((link, parent)) = stack.pop() {
        let index = entries.len();
        entries.push(ChainEntry {
            link,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            entries[parent].children.push(index);
        }
        for child in link.evolves_to.iter().rev() {
            stack.push((child, Some(index)));
        }
    }

    entries
}

/// Linearize the included part of the chain. A stage with several included
/// children emits them all as split evolutions and stops there.
fn collect_stages(
    entries: &[ChainEntry<'_>],
    included: &[bool],
    index: usize,
    level: u32,
    split: bool,
    out: &mut Vec<Stage>,
) {
    out.push(Stage {
        index,
        level,
        split,
    });

    let children: Vec<usize> = entries[index]
        .children
        .iter()
        .copied()
        .filter(|c| included[*c])
        .collect();

    match children.as_slice() {
        [] => {}
        [only] => collect_stages(entries, included, *only, level + 1, false, out),
        many => {
            for child in many {
                out.push(Stage {
                    index: *child,
                    level: level + 1,
                    split: true,
                });
            }
        }
    }
}

/// Turn a linearized regional chain into a tree.
///
/// The first entry is the root. Each following entry hangs off the current
/// stage; a non-split entry then becomes the current stage, a split entry
/// stays a leaf sibling.
pub fn adapt_regional_chain(chain: &[FlatPokemon]) -> Option<EvolutionNode> {
    let (first, rest) = chain.split_first()?;
    let mut root = node_from_flat(first, None);
    let mut path: Vec<usize> = Vec::new();

    for entry in rest {
        let current = path
            .iter()
            .fold(&mut root, |node, &i| &mut node.evolutions[i]);
        let child = node_from_flat(entry, Some(&*current));
        current.evolutions.push(child);
        if !entry.is_split_evolution {
            path.push(current.evolutions.len() - 1);
        }
    }

    Some(root)
}

fn node_from_flat(flat: &FlatPokemon, parent: Option<&EvolutionNode>) -> EvolutionNode {
    EvolutionNode {
        id: flat.id,
        name: flat.name.clone(),
        types: flat.types.clone(),
        forms: flat.forms.clone(),
        level: parent.map_or(0, |p| p.level + 1),
        parent_id: parent.map(|p| p.id),
        sprite: flat.sprite.clone(),
        shiny_sprite: flat.shiny_sprite.clone(),
        evolutions: Vec::new(),
        evolution_details: flat.evolution_details.clone(),
        is_split_evolution: flat.is_split_evolution,
    }
}
