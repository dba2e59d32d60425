//! craftplan — recipe expansion and bill-of-materials planning.
//!
//! Expands requested quantities of crafted items into base-material totals
//! and breakdown trees. Cycle-safe, order-stable, BLAKE3 provenance.

pub mod cli;
pub mod core;
pub mod provenance;
