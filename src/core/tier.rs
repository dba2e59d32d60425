//! CP-003: Tier computation — approximate depth of an item in the recipe graph.
//!
//! Tier 1 is a base material. A crafted item sits one tier above its deepest
//! input. The `seen` set is shared by every branch of one top-level call and
//! never popped: once any branch has entered an item, later encounters of that
//! item (from any sibling) count as tier 1. This bounds the walk on cyclic
//! graphs but under-reports depth on diamond-shaped graphs. Tiers are display
//! tags, not exact depths.

use super::types::{Catalogue, Item};
use rustc_hash::FxHashSet;

/// Tier of an item, starting from an empty seen set.
pub fn tier(item: &Item, catalogue: &Catalogue) -> u32 {
    let mut seen = FxHashSet::default();
    compute_tier(item, catalogue, &mut seen)
}

/// Tier of an item using a caller-owned seen set.
///
/// Input references missing from the catalogue are skipped.
pub fn compute_tier(item: &Item, catalogue: &Catalogue, seen: &mut FxHashSet<String>) -> u32 {
    if item.is_base() || seen.contains(&item.id) {
        return 1;
    }
    seen.insert(item.id.clone());

    let mut deepest = 0;
    for input in &item.inputs {
        if let Some(child) = catalogue.get(&input.item_id) {
            deepest = deepest.max(compute_tier(child, catalogue, seen));
        }
    }
    1 + deepest
}

/// Short tag used in listings, e.g. `T3`.
pub fn tier_tag(tier: u32) -> String {
    format!("T{}", tier.max(1))
}
