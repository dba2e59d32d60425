//! CP-005: Job planning — expand every job line and merge the results.

use super::expander;
use super::types::*;
use rustc_hash::FxHashSet;

/// Plan a job: expand each line with its own empty visited path, sum totals
/// across lines, and keep one breakdown tree per line that produced one.
///
/// Lines are processed strictly in order so floating-point totals are
/// reproducible.
pub fn plan_job(lines: &[JobLine], catalogue: &Catalogue) -> JobPlan {
    let mut totals = Totals::new();
    let mut trees = Vec::new();

    for line in lines {
        let mut visited = FxHashSet::default();
        let expansion = expander::expand(&line.item_id, line.qty, catalogue, &mut visited);
        merge_totals(&mut totals, &expansion.totals);
        if let Some(tree) = expansion.tree {
            trees.push(tree);
        }
    }

    JobPlan { totals, trees }
}

/// Drop lines a form would never submit: empty ids and non-positive (or NaN)
/// quantities.
pub fn plannable_lines(lines: &[JobLine]) -> Vec<JobLine> {
    lines
        .iter()
        .filter(|l| !l.item_id.trim().is_empty() && l.qty > 0.0)
        .cloned()
        .collect()
}

/// Parse an ad-hoc line spec: `ITEM` (quantity 1) or `ITEM=QTY`.
pub fn parse_line_spec(spec: &str) -> Result<JobLine, String> {
    let (id, qty) = match spec.split_once('=') {
        Some((id, qty)) => {
            let qty: f64 = qty
                .trim()
                .parse()
                .map_err(|e| format!("invalid quantity in '{}': {}", spec, e))?;
            (id.trim(), qty)
        }
        None => (spec.trim(), 1.0),
    };
    if id.is_empty() {
        return Err(format!("missing item id in '{}'", spec));
    }
    Ok(JobLine::new(id, qty))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, output_qty: f64, inputs: &[(&str, f64)]) -> Item {
        Item {
            id: id.to_string(),
            pack_id: "p".to_string(),
            name: id.to_uppercase(),
            output_qty,
            time: 0.0,
            inputs: inputs
                .iter()
                .map(|(i, q)| ItemInput {
                    item_id: i.to_string(),
                    qty: *q,
                })
                .collect(),
        }
    }

    fn minecraft() -> Catalogue {
        vec![
            item("log", 1.0, &[]),
            item("cobble", 1.0, &[]),
            item("plank", 4.0, &[("log", 1.0)]),
            item("stick", 4.0, &[("plank", 2.0)]),
            item("pickaxe", 1.0, &[("cobble", 3.0), ("stick", 2.0)]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_cp005_merges_repeated_leaf_lines() {
        let cat: Catalogue = vec![item("a", 1.0, &[])].into_iter().collect();
        let plan = plan_job(&[JobLine::new("a", 2.0), JobLine::new("a", 3.0)], &cat);
        assert_eq!(plan.totals.len(), 1);
        assert_eq!(plan.totals["a"], 5.0);
        assert_eq!(plan.trees.len(), 2);
        assert_eq!(plan.trees[0].qty, 2.0);
        assert_eq!(plan.trees[1].qty, 3.0);
    }

    #[test]
    fn test_cp005_pickaxe_job() {
        let cat = minecraft();
        let plan = plan_job(&[JobLine::new("pickaxe", 2.0)], &cat);
        // 2 pickaxes: 6 cobble, 4 sticks -> 1 stick run -> 2 planks -> 0.5 log runs
        assert_eq!(plan.totals["cobble"], 6.0);
        assert_eq!(plan.totals["log"], 0.5);
        assert!(!plan.totals.contains_key("stick"));
        assert!(!plan.totals.contains_key("plank"));
        assert_eq!(plan.trees.len(), 1);
        assert_eq!(plan.trees[0].node_count(), 5);
    }

    #[test]
    fn test_cp005_unknown_lines_skipped() {
        let cat = minecraft();
        let plan = plan_job(
            &[
                JobLine::new("ghost", 1.0),
                JobLine::new("log", 2.0),
                JobLine::new("ghost2", 4.0),
            ],
            &cat,
        );
        assert_eq!(plan.trees.len(), 1);
        assert_eq!(plan.trees[0].item_id, "log");
        assert_eq!(plan.totals["log"], 2.0);
    }

    #[test]
    fn test_cp005_each_line_gets_fresh_visited_path() {
        let cat: Catalogue = vec![item("f", 1.0, &[("f", 1.0)])].into_iter().collect();
        let plan = plan_job(&[JobLine::new("f", 1.0), JobLine::new("f", 2.0)], &cat);
        // Both lines produce a root node; neither is cut at the top.
        assert_eq!(plan.trees.len(), 2);
        assert_eq!(plan.totals["f"], 3.0);
    }

    #[test]
    fn test_cp005_empty_job() {
        let plan = plan_job(&[], &minecraft());
        assert!(plan.is_empty());
    }

    #[test]
    fn test_cp005_totals_order_follows_first_contribution() {
        let cat = minecraft();
        let plan = plan_job(&[JobLine::new("log", 1.0), JobLine::new("pickaxe", 1.0)], &cat);
        let keys: Vec<_> = plan.totals.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["log", "cobble"]);
    }

    #[test]
    fn test_cp005_plannable_lines() {
        let lines = vec![
            JobLine::new("a", 1.0),
            JobLine::new("", 1.0),
            JobLine::new("b", 0.0),
            JobLine::new("c", -2.0),
            JobLine::new("d", f64::NAN),
            JobLine::new("e", 0.5),
        ];
        let kept = plannable_lines(&lines);
        let ids: Vec<_> = kept.iter().map(|l| l.item_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "e"]);
    }

    #[test]
    fn test_cp005_parse_line_spec() {
        assert_eq!(parse_line_spec("plank=12").unwrap(), JobLine::new("plank", 12.0));
        assert_eq!(parse_line_spec("stick").unwrap(), JobLine::new("stick", 1.0));
        assert_eq!(parse_line_spec(" ore = 2.5 ").unwrap(), JobLine::new("ore", 2.5));
        assert!(parse_line_spec("=3").unwrap_err().contains("missing item id"));
        assert!(parse_line_spec("ore=lots").unwrap_err().contains("invalid quantity"));
    }
}
