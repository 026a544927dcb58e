// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! skillpath-kernel: deterministic event types, progress derivation and
//! prerequisite-based access policy for a single-user learning log.

pub mod answer;
pub mod config;
pub mod error;
pub mod event;
pub mod graph;
pub mod policy;
pub mod replay;
pub mod state;
pub mod types;
pub mod verify;

#[cfg(test)]
pub mod tests;
