//! Tree projections and rendering hints.

use crate::model::{EvolutionDetails, EvolutionNode, FlatPokemon};

/// Species whose family is drawn radially around the base stage.
const RADIAL_FAMILY_ROOT: &str = "eevee";

/// Pre-order projection of the tree; children keep their source order.
pub fn flatten(tree: &EvolutionNode) -> Vec<FlatPokemon> {
    let mut out = Vec::with_capacity(tree.stage_count());
    flatten_into(tree, &mut out);
    out
}

fn flatten_into(node: &EvolutionNode, out: &mut Vec<FlatPokemon>) {
    out.push(FlatPokemon {
        id: node.id,
        name: node.name.clone(),
        types: node.types.clone(),
        forms: node.forms.clone(),
        level: node.level,
        sprite: node.sprite.clone(),
        shiny_sprite: node.shiny_sprite.clone(),
        evolution_details: node.evolution_details.clone(),
        evolution_method: node.evolution_details().map(format_evolution_method),
        is_split_evolution: node.is_split_evolution,
    });
    for child in &node.evolutions {
        flatten_into(child, out);
    }
}

/// Whether the chain should use the radial layout.
pub fn is_radial_family(flat: &[FlatPokemon]) -> bool {
    flat.iter()
        .any(|pokemon| pokemon.name.to_lowercase() == RADIAL_FAMILY_ROOT)
}

/// Short summary of an evolution condition, e.g. `Lv 16` or
/// `water stone, use item`.
pub fn format_evolution_method(details: &EvolutionDetails) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(level) = details.min_level.filter(|l| *l > 0) {
        parts.push(format!("Lv {level}"));
    }
    if let Some(item) = &details.item {
        parts.push(item.replace('-', " "));
    }
    if let Some(trigger) = details.trigger.as_deref().filter(|t| *t != "level-up") {
        parts.push(trigger.replace('-', " "));
    }
    if let Some(happiness) = details.min_happiness.filter(|h| *h > 0) {
        parts.push(format!("Happiness {happiness}+"));
    }
    if let Some(time) = &details.time_of_day {
        parts.push(format!("{time} time"));
    }
    if let Some(location) = &details.location {
        parts.push(format!("at {}", location.replace('-', " ")));
    }
    if let Some(known_move) = &details.known_move {
        parts.push(format!("knowing {}", known_move.replace('-', " ")));
    }
    if let Some(beauty) = details.min_beauty.filter(|b| *b > 0) {
        parts.push(format!("Beauty {beauty}+"));
    }

    if parts.is_empty() {
        "Evolves".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::SpeciesId;
    use pretty_assertions::assert_eq;

    fn node(id: u32, name: &str, children: Vec<EvolutionNode>) -> EvolutionNode {
        EvolutionNode {
            id: SpeciesId(id),
            name: name.to_string(),
            types: Vec::new(),
            forms: Vec::new(),
            level: 0,
            parent_id: None,
            sprite: String::new(),
            shiny_sprite: String::new(),
            evolutions: children,
            evolution_details: Vec::new(),
            is_split_evolution: false,
        }
    }

    fn flat_named(names: &[&str]) -> Vec<FlatPokemon> {
        let tree = node(
            1,
            names[0],
            names[1..]
                .iter()
                .enumerate()
                .map(|(i, n)| node(i as u32 + 2, n, Vec::new()))
                .collect(),
        );
        flatten(&tree)
    }

    #[test]
    fn test_flatten_is_pre_order() {
        let tree = node(
            1,
            "root",
            vec![
                node(2, "a", vec![node(3, "a1", Vec::new())]),
                node(4, "b", Vec::new()),
            ],
        );

        let names: Vec<String> = flatten(&tree).into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["root", "a", "a1", "b"]);
    }

    #[test]
    fn test_flatten_carries_evolution_method() {
        let mut child = node(2, "ivysaur", Vec::new());
        child.evolution_details = vec![EvolutionDetails {
            trigger: Some("level-up".into()),
            min_level: Some(16),
            ..Default::default()
        }];
        let tree = node(1, "bulbasaur", vec![child]);

        let flat = flatten(&tree);
        assert_eq!(flat[0].evolution_method, None);
        assert_eq!(flat[1].evolution_method.as_deref(), Some("Lv 16"));
    }

    #[test]
    fn test_radial_family_with_eevee() {
        let flat = flat_named(&[
            "eevee", "vaporeon", "jolteon", "flareon", "espeon", "umbreon", "leafeon", "glaceon",
            "sylveon",
        ]);
        assert_eq!(flat.len(), 9);
        assert!(is_radial_family(&flat));
    }

    #[test]
    fn test_radial_family_requires_exact_name() {
        assert!(!is_radial_family(&flat_named(&["oddish", "gloom", "vileplume", "bellossom"])));
        assert!(!is_radial_family(&flat_named(&["eevee-starter"])));
        assert!(is_radial_family(&flat_named(&["Eevee"])));
        assert!(!is_radial_family(&[]));
    }

    #[test]
    fn test_format_evolution_method() {
        let stone = EvolutionDetails {
            trigger: Some("use-item".into()),
            item: Some("water-stone".into()),
            ..Default::default()
        };
        assert_eq!(format_evolution_method(&stone), "water stone, use item");

        let friendship = EvolutionDetails {
            trigger: Some("level-up".into()),
            min_happiness: Some(160),
            time_of_day: Some("night".into()),
            ..Default::default()
        };
        assert_eq!(
            format_evolution_method(&friendship),
            "Happiness 160+, night time"
        );

        let feebas = EvolutionDetails {
            trigger: Some("level-up".into()),
            min_beauty: Some(171),
            ..Default::default()
        };
        assert_eq!(format_evolution_method(&feebas), "Beauty 171+");

        let move_at = EvolutionDetails {
            trigger: Some("level-up".into()),
            known_move: Some("ancient-power".into()),
            location: Some("mt-coronet".into()),
            ..Default::default()
        };
        assert_eq!(
            format_evolution_method(&move_at),
            "at mt coronet, knowing ancient power"
        );

        assert_eq!(format_evolution_method(&EvolutionDetails::default()), "Evolves");
    }
}
