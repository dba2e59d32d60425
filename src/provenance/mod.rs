//! Provenance — BLAKE3 fingerprints and the append-only planning log.

pub mod eventlog;
pub mod hasher;
