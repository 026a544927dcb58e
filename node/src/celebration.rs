// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Celebration triggers.
//!
//! Which milestones deserve a celebration is product policy, so it sits
//! behind a trait. The default never fires.

use serde::{Deserialize, Serialize};
use skillpath_kernel::policy::AccessPolicy;
use skillpath_kernel::state::UserState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Celebration {
    StreakMilestone { streak: u32 },
    LevelUp { level: u32 },
    AllContentComplete,
}

pub trait CelebrationPolicy {
    /// Inspects the transition caused by one attempt.
    fn detect(&self, before: &UserState, after: &UserState, policy: &AccessPolicy) -> Option<Celebration>;
}

/// Never celebrates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCelebrations;

impl CelebrationPolicy for NoCelebrations {
    fn detect(&self, _before: &UserState, _after: &UserState, _policy: &AccessPolicy) -> Option<Celebration> {
        None
    }
}

/// Fires on finishing the graph, reaching a configured streak, or levelling
/// up, in that priority. At most one trigger per attempt.
#[derive(Clone, Debug)]
pub struct MilestoneCelebrations {
    streak_milestones: Vec<u32>,
}

impl MilestoneCelebrations {
    pub fn new(streak_milestones: Vec<u32>) -> Self {
        Self { streak_milestones }
    }
}

impl Default for MilestoneCelebrations {
    fn default() -> Self {
        Self::new(vec![5, 10, 25, 50, 100])
    }
}

impl CelebrationPolicy for MilestoneCelebrations {
    fn detect(&self, before: &UserState, after: &UserState, policy: &AccessPolicy) -> Option<Celebration> {
        if !policy.graph().is_empty()
            && policy.next_node(before).is_some()
            && policy.next_node(after).is_none()
        {
            return Some(Celebration::AllContentComplete);
        }
        if after.streak > before.streak && self.streak_milestones.contains(&after.streak) {
            return Some(Celebration::StreakMilestone { streak: after.streak });
        }
        if after.level > before.level {
            return Some(Celebration::LevelUp { level: after.level });
        }
        None
    }
}
