//! CP-006: Text rendering — breakdown trees, plan reports, item listings.
//!
//! Quantities are rounded to two decimals for display only, ties away from
//! zero, with trailing zeros dropped (`2.50` prints as `2.5`, `10.00` as `10`).

use super::tier;
use super::types::*;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Format a display quantity.
pub fn format_qty(qty: f64) -> String {
    // `{:.2}` alone rounds exact ties to even (0.125 -> 0.12)
    let fixed = format!("{:.2}", (qty * 100.0).round() / 100.0);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Render a breakdown tree, one `- {name} x {qty}` line per node, children
/// indented one level deeper. An absent node renders as nothing.
pub fn format_tree(node: Option<&BreakdownNode>, depth: usize) -> String {
    let mut out = String::new();
    if let Some(node) = node {
        write_node(&mut out, node, depth);
    }
    out
}

fn write_node(out: &mut String, node: &BreakdownNode, depth: usize) {
    let _ = writeln!(
        out,
        "{}- {} x {}",
        INDENT.repeat(depth),
        node.name,
        format_qty(node.qty)
    );
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}

/// Render totals as `{name} x {qty}` lines, names resolved through the
/// catalogue.
pub fn format_totals(totals: &Totals, catalogue: &Catalogue) -> String {
    let mut out = String::new();
    for (id, qty) in totals {
        let _ = writeln!(out, "{} x {}", catalogue.display_name(id), format_qty(*qty));
    }
    out
}

/// Render a full plan report: totals, then every breakdown tree.
pub fn format_plan(plan: &JobPlan, catalogue: &Catalogue) -> String {
    if plan.is_empty() {
        return "No totals to display.\n".to_string();
    }

    let mut out = String::new();
    if !plan.totals.is_empty() {
        out.push_str("Totals:\n");
        out.push_str(&format_totals(&plan.totals, catalogue));
    }
    if !plan.trees.is_empty() {
        if !plan.totals.is_empty() {
            out.push('\n');
        }
        out.push_str("Breakdown:\n");
        for tree in &plan.trees {
            out.push_str(&format_tree(Some(tree), 0));
        }
    }
    out
}

/// Render a catalogue listing sorted by name, each item tagged with its tier.
pub fn format_item_list(catalogue: &Catalogue) -> String {
    let mut items: Vec<&Item> = catalogue.iter().collect();
    items.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut out = String::new();
    for item in items {
        let tag = tier::tier_tag(tier::tier(item, catalogue));
        let _ = writeln!(out, "{} ({})", item.name, tag);
    }
    out
}
