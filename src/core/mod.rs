//! Core planning logic — types, parsing, tiers, expansion, aggregation, rendering.

pub mod expander;
pub mod format;
pub mod parser;
pub mod planner;
pub mod store;
pub mod tier;
pub mod types;
