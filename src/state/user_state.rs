// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Derived user progress.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_XP_PER_LEVEL;
use crate::types::id::{EventId, NodeId};

/// Snapshot of one user's progress, derived from the event log.
///
/// This is a cache, never truth. `last_processed_event_id` is the
/// high-water mark for incremental derivation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserState {
    pub xp: u64,
    pub streak: u32,
    pub completed_nodes: BTreeSet<NodeId>,
    pub attempted_nodes: BTreeSet<NodeId>,
    pub level: u32,
    pub xp_to_next_level: u32,
    pub last_processed_event_id: Option<EventId>,
}

impl UserState {
    /// State before any event, for the given level width.
    pub fn empty(xp_per_level: u32) -> Self {
        let mut state = Self {
            xp: 0,
            streak: 0,
            completed_nodes: BTreeSet::new(),
            attempted_nodes: BTreeSet::new(),
            level: 1,
            xp_to_next_level: 0,
            last_processed_event_id: None,
        };
        state.refresh_level(xp_per_level);
        state
    }

    /// Recomputes `level` and `xp_to_next_level` from `xp`.
    pub fn refresh_level(&mut self, xp_per_level: u32) {
        let width = u64::from(xp_per_level.max(1));
        self.level = u32::try_from(self.xp / width + 1).unwrap_or(u32::MAX);
        // `xp % width` < width <= u32::MAX
        self.xp_to_next_level = (width - self.xp % width) as u32;
    }

    pub fn has_completed(&self, node: &NodeId) -> bool {
        self.completed_nodes.contains(node)
    }

    pub fn has_attempted(&self, node: &NodeId) -> bool {
        self.attempted_nodes.contains(node)
    }
}

impl Default for UserState {
    fn default() -> Self {
        Self::empty(DEFAULT_XP_PER_LEVEL)
    }
}
