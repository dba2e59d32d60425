//! CP-004: Recursive expansion of a requested quantity into base materials.
//!
//! Walks the recipe graph depth-first, scaling each input by the number of
//! craft runs (`quantity / output_qty`). Totals accumulate only at base
//! materials and at cycle cut points. The visited path is a push/pop stack:
//! an item is on it only while its own inputs are being expanded, so sibling
//! branches of a diamond both expand the shared input in full.

use super::types::{add_to_totals, merge_totals, BreakdownNode, Catalogue, Expansion, Totals};
use rustc_hash::FxHashSet;

/// Expand `quantity` of `item_id` with a caller-owned visited path.
///
/// - Unknown ids yield an empty expansion.
/// - Re-entering an item already on the path records `quantity` for it as
///   if it were a base material and emits no tree node.
/// - Quantities are not validated; zero and negative values flow through.
pub fn expand(
    item_id: &str,
    quantity: f64,
    catalogue: &Catalogue,
    visited: &mut FxHashSet<String>,
) -> Expansion {
    let item = match catalogue.get(item_id) {
        Some(i) => i,
        None => return Expansion::default(),
    };

    let mut totals = Totals::new();

    if visited.contains(item_id) {
        add_to_totals(&mut totals, item_id, quantity);
        return Expansion { totals, tree: None };
    }

    if item.is_base() {
        add_to_totals(&mut totals, item_id, quantity);
        return Expansion {
            totals,
            tree: Some(BreakdownNode::leaf(item, quantity)),
        };
    }

    let runs = quantity / item.effective_output_qty();
    let mut children = Vec::with_capacity(item.inputs.len());

    visited.insert(item_id.to_string());
    for input in &item.inputs {
        let sub = expand(&input.item_id, input.qty * runs, catalogue, visited);
        merge_totals(&mut totals, &sub.totals);
        if let Some(node) = sub.tree {
            children.push(node);
        }
    }
    visited.remove(item_id);

    Expansion {
        totals,
        tree: Some(BreakdownNode {
            item_id: item.id.clone(),
            name: item.name.clone(),
            qty: quantity,
            children,
        }),
    }
}

/// Expand `quantity` of `item_id` from an empty visited path.
pub fn expand_item(item_id: &str, quantity: f64, catalogue: &Catalogue) -> Expansion {
    let mut visited = FxHashSet::default();
    expand(item_id, quantity, catalogue, &mut visited)
}
