//! CP-001: Workbook, catalogue and plan types.
//!
//! Records mirror the bulk interchange document (`packs`, `items`, `jobs`)
//! with camelCase field names, so the same types read YAML workbooks and
//! JSON exports. All records derive Serialize/Deserialize.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Workbook document
// ============================================================================

/// Root document — every pack, item and job known to the planner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    /// Schema version (must be "1.0")
    #[serde(default = "default_version")]
    pub version: String,

    /// Optional human-readable workbook name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Packs (catalogue namespaces)
    pub packs: Vec<Pack>,

    /// Item definitions across all packs
    pub items: Vec<Item>,

    /// Saved jobs across all packs
    pub jobs: Vec<Job>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Workbook {
    /// Look up a pack by id.
    pub fn pack(&self, pack_id: &str) -> Option<&Pack> {
        self.packs.iter().find(|p| p.id == pack_id)
    }

    /// Resolve an optional pack id, defaulting to the first pack.
    pub fn select_pack(&self, pack_id: Option<&str>) -> Result<&Pack, String> {
        match pack_id {
            Some(id) => self.pack(id).ok_or_else(|| format!("unknown pack: {}", id)),
            None => self
                .packs
                .first()
                .ok_or_else(|| "workbook has no packs".to_string()),
        }
    }

    /// Items belonging to a pack, in document order.
    pub fn items_in_pack<'a, 'b>(
        &'a self,
        pack_id: &'b str,
    ) -> impl Iterator<Item = &'a Item> + 'b
    where
        'a: 'b,
    {
        self.items.iter().filter(move |i| i.pack_id == pack_id)
    }

    /// Jobs belonging to a pack, in document order.
    pub fn jobs_in_pack<'a, 'b>(
        &'a self,
        pack_id: &'b str,
    ) -> impl Iterator<Item = &'a Job> + 'b
    where
        'a: 'b,
    {
        self.jobs.iter().filter(move |j| j.pack_id == pack_id)
    }

    /// Look up a job by id within a pack.
    pub fn job(&self, pack_id: &str, job_id: &str) -> Option<&Job> {
        self.jobs
            .iter()
            .find(|j| j.pack_id == pack_id && j.id == job_id)
    }
}

/// A named namespace grouping a catalogue of items and jobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pack {
    pub id: String,
    pub name: String,
}

// ============================================================================
// Items
// ============================================================================

/// A craftable or raw item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Stable identifier, unique within the workbook
    pub id: String,

    /// Owning pack
    #[serde(default)]
    pub pack_id: String,

    /// Display name
    pub name: String,

    /// Quantity produced per craft
    #[serde(default = "default_output_qty")]
    pub output_qty: f64,

    /// Craft time in seconds (informational, omitted from documents when 0)
    #[serde(default, skip_serializing_if = "is_zero")]
    pub time: f64,

    /// Inputs consumed per craft, in display order
    #[serde(default)]
    pub inputs: Vec<ItemInput>,
}

fn default_output_qty() -> f64 {
    1.0
}

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

impl Item {
    /// An item with no inputs is a base material.
    pub fn is_base(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Output quantity used to derive craft runs. Zero (or NaN) counts as one
    /// so a malformed record never divides by zero.
    pub fn effective_output_qty(&self) -> f64 {
        if self.output_qty == 0.0 || self.output_qty.is_nan() {
            1.0
        } else {
            self.output_qty
        }
    }
}

/// One input of a recipe: `qty` units of `item_id` per craft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    pub item_id: String,
    pub qty: f64,
}

// ============================================================================
// Jobs
// ============================================================================

/// A saved job — named set of requested items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,

    #[serde(default)]
    pub pack_id: String,

    pub name: String,

    #[serde(default)]
    pub lines: Vec<JobLine>,
}

/// A requested quantity of a top-level item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobLine {
    pub item_id: String,
    pub qty: f64,
}

impl JobLine {
    pub fn new(item_id: impl Into<String>, qty: f64) -> Self {
        Self {
            item_id: item_id.into(),
            qty,
        }
    }
}

// ============================================================================
// Catalogue
// ============================================================================

/// Item definitions of a single pack, keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    items: IndexMap<String, Item>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scope a workbook to one pack.
    pub fn for_pack(workbook: &Workbook, pack_id: &str) -> Self {
        workbook.items_in_pack(pack_id).cloned().collect()
    }

    /// Insert an item by id. The first definition of an id wins; later
    /// duplicates are ignored.
    pub fn insert(&mut self, item: Item) {
        self.items.entry(item.id.clone()).or_insert(item);
    }

    pub fn get(&self, item_id: &str) -> Option<&Item> {
        self.items.get(item_id)
    }

    /// Display name for an id, falling back to the id itself.
    pub fn display_name<'a>(&'a self, item_id: &'a str) -> &'a str {
        self.get(item_id).map(|i| i.name.as_str()).unwrap_or(item_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl FromIterator<Item> for Catalogue {
    fn from_iter<T: IntoIterator<Item = Item>>(iter: T) -> Self {
        let mut catalogue = Self::new();
        for item in iter {
            catalogue.insert(item);
        }
        catalogue
    }
}

// ============================================================================
// Plans
// ============================================================================

/// Aggregated base-material quantities, in first-contribution order.
pub type Totals = IndexMap<String, f64>;

/// Add `qty` to `totals[item_id]`.
pub fn add_to_totals(totals: &mut Totals, item_id: &str, qty: f64) {
    *totals.entry(item_id.to_string()).or_insert(0.0) += qty;
}

/// Sum every entry of `other` into `totals`.
pub fn merge_totals(totals: &mut Totals, other: &Totals) {
    for (id, qty) in other {
        add_to_totals(totals, id, *qty);
    }
}

/// One node of a breakdown tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownNode {
    pub item_id: String,
    pub name: String,
    pub qty: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BreakdownNode>,
}

impl BreakdownNode {
    pub fn leaf(item: &Item, qty: f64) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            qty,
            children: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Longest root-to-leaf path, counted in nodes.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Self::depth).max().unwrap_or(0)
    }
}

/// Result of expanding one requested quantity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    pub totals: Totals,
    /// `None` for unknown items and cycle re-entries.
    pub tree: Option<BreakdownNode>,
}

/// Result of planning a whole job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPlan {
    pub totals: Totals,
    pub trees: Vec<BreakdownNode>,
}

impl JobPlan {
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty() && self.trees.is_empty()
    }
}

// ============================================================================
// Validation
// ============================================================================

/// Severity of a workbook problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "ERROR"),
            Self::Warning => write!(f, "WARNING"),
        }
    }
}

// ============================================================================
// Provenance events
// ============================================================================

/// Planning events appended to the JSONL log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PlanEvent {
    PlanComputed {
        run_id: String,
        pack: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        job: Option<String>,
        lines: usize,
        base_materials: usize,
        workbook_hash: String,
        totals_hash: String,
    },
    WorkbookExported {
        path: String,
        workbook_hash: String,
    },
}

/// Event with timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampedEvent {
    pub ts: String,
    #[serde(flatten)]
    pub event: PlanEvent,
}
