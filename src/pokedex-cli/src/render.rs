//! Plain-text rendering of evolution trees.

use std::fmt::Write;

use pokedex_evolution::{
    EvolutionNode, RegionalChain, ResolvedChain, adapt_regional_chain, format_evolution_method,
};

/// Render a resolved chain as an indented tree.
pub fn render_chain(chain: &ResolvedChain) -> String {
    let mut out = String::new();
    render_node(&chain.tree, "", None, &mut out);
    if chain.radial_layout {
        out.push_str("layout: radial\n");
    }
    out
}

/// Render one regional side-chain under its variant name.
pub fn render_variant(chain: &RegionalChain) -> String {
    let mut out = format!("{}:\n", chain.variant);
    if let Some(tree) = adapt_regional_chain(&chain.chain) {
        render_node(&tree, "  ", None, &mut out);
    }
    out
}

fn render_node(node: &EvolutionNode, prefix: &str, is_last: Option<bool>, out: &mut String) {
    let (branch, indent) = match is_last {
        None => ("", ""),
        Some(true) => ("└── ", "    "),
        Some(false) => ("├── ", "│   "),
    };
    let _ = writeln!(out, "{prefix}{branch}{}", stage_label(node));

    let child_prefix = format!("{prefix}{indent}");
    let count = node.evolutions.len();
    for (i, child) in node.evolutions.iter().enumerate() {
        render_node(child, &child_prefix, Some(i + 1 == count), out);
    }
}

fn stage_label(node: &EvolutionNode) -> String {
    let mut label = format!("{} #{}", node.name, node.id);
    if !node.types.is_empty() {
        let _ = write!(label, " [{}]", node.types.join("/"));
    }
    if let Some(details) = node.evolution_details() {
        let _ = write!(label, " ({})", format_evolution_method(details));
    }
    if node.is_split_evolution {
        label.push_str(" split");
    }
    if !node.forms.is_empty() {
        let forms: Vec<&str> = node.forms.iter().map(|f| f.display_name.as_str()).collect();
        let _ = write!(label, " forms: {}", forms.join(", "));
    }
    label
}
