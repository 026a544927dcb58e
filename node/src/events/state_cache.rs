// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Per-user cache of derived state.
//!
//! Entries are hints for the incremental derivation path, never truth. A
//! cached state is returned as-is only when its high-water mark equals the
//! newest event id of the user's history.

use std::collections::HashMap;

use skillpath_kernel::event::Event;
use skillpath_kernel::replay::StateDeriver;
use skillpath_kernel::state::UserState;
use skillpath_kernel::types::id::UserId;

#[derive(Clone, Debug, Default)]
pub struct StateCache {
    states: HashMap<UserId, UserState>,
}

impl StateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state for `user` given their full `history`.
    pub fn refresh(&mut self, deriver: &StateDeriver, user: &UserId, history: &[Event]) -> UserState {
        let latest = history.iter().map(|e| e.id).max();
        if let Some(cached) = self.states.get(user) {
            if StateDeriver::is_fresh(cached, latest) {
                return cached.clone();
            }
        }

        let start = std::time::Instant::now();
        let state = deriver.derive(history, self.states.get(user));
        metrics::histogram!("skillpath_derive_duration_seconds", start.elapsed().as_secs_f64());

        self.states.insert(user.clone(), state.clone());
        state
    }
}
