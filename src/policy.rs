// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Access Policy Engine
//!
//! Gates content using the static skill graph and a derived `UserState`.
//! Every query is pure; the only mutable field is `override_mode`.

use serde::{Deserialize, Serialize};

use crate::graph::node::SkillNode;
use crate::graph::pool::SkillGraph;
use crate::state::user_state::UserState;
use crate::types::enums::{AccessDecision, AccessReason, VisualState};
use crate::types::id::NodeId;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOptions {
    pub override_mode: bool,
}

#[derive(Clone, Debug)]
pub struct AccessPolicy {
    graph: SkillGraph,
    override_mode: bool,
}

impl AccessPolicy {
    pub fn new(graph: SkillGraph) -> Self {
        Self {
            graph,
            override_mode: false,
        }
    }

    pub fn graph(&self) -> &SkillGraph {
        &self.graph
    }

    pub fn override_mode(&self) -> bool {
        self.override_mode
    }

    /// Updates options in place.
    pub fn configure(&mut self, options: PolicyOptions) -> &mut Self {
        self.override_mode = options.override_mode;
        self
    }

    /// Prerequisites of `node` that `state` has not completed, in declared order.
    pub fn unmet_prerequisites<'a>(&self, node: &'a SkillNode, state: &UserState) -> Vec<&'a NodeId> {
        node.prerequisites
            .iter()
            .filter(|p| !state.has_completed(p))
            .collect()
    }

    pub fn can_access(&self, node_id: &NodeId, state: &UserState) -> AccessDecision {
        if self.override_mode {
            return AccessDecision { allowed: true, reason: AccessReason::Override };
        }
        let Some(node) = self.graph.get(node_id) else {
            return AccessDecision { allowed: false, reason: AccessReason::NotFound };
        };
        if self.unmet_prerequisites(node, state).is_empty() {
            AccessDecision { allowed: true, reason: AccessReason::PrereqsMet }
        } else {
            AccessDecision { allowed: false, reason: AccessReason::PrereqMissing }
        }
    }

    /// UI status of a node. Independent of override mode.
    pub fn visual_state(&self, node_id: &NodeId, state: &UserState) -> VisualState {
        if state.has_completed(node_id) {
            return VisualState::Completed;
        }
        let Some(node) = self.graph.get(node_id) else {
            return VisualState::LockedFar;
        };
        match self.unmet_prerequisites(node, state).len() {
            0 if state.has_attempted(node_id) => VisualState::InProgress,
            0 => VisualState::UnlockedNew,
            1 => VisualState::LockedNear,
            _ => VisualState::LockedFar,
        }
    }

    /// Accessible, not yet completed nodes in graph order.
    pub fn available_nodes(&self, state: &UserState) -> Vec<&SkillNode> {
        self.graph
            .iter()
            .filter(|n| !state.has_completed(&n.id) && self.can_access(&n.id, state).allowed)
            .collect()
    }

    /// First available node; `None` means all reachable content is complete.
    pub fn next_node(&self, state: &UserState) -> Option<&SkillNode> {
        self.graph
            .iter()
            .find(|n| !state.has_completed(&n.id) && self.can_access(&n.id, state).allowed)
    }
}
