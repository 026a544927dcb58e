//! Skill graph: the ordered, immutable set of nodes.

// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::collections::{HashMap, HashSet};

use crate::error::{KernelError, Result};
use crate::graph::node::SkillNode;
use crate::types::id::NodeId;

/// Prerequisite graph loaded once at startup.
///
/// Node order is authoring order and is what "first available node" means.
/// Prerequisites must name existing nodes. Cycles are not detected.
#[derive(Clone, Debug, Default)]
pub struct SkillGraph {
    nodes: Vec<SkillNode>,
    index: HashMap<NodeId, usize>,
}

impl SkillGraph {
    pub fn new(nodes: Vec<SkillNode>) -> Result<Self> {
        let mut index = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), pos).is_some() {
                return Err(KernelError::InvalidGraph(format!("duplicate node id {}", node.id)));
            }
        }

        for node in &nodes {
            let mut seen = HashSet::new();
            for prereq in &node.prerequisites {
                if !index.contains_key(prereq) {
                    return Err(KernelError::InvalidGraph(format!(
                        "node {} requires unknown node {}",
                        node.id, prereq
                    )));
                }
                if prereq == &node.id {
                    return Err(KernelError::InvalidGraph(format!("node {} requires itself", node.id)));
                }
                if !seen.insert(prereq) {
                    return Err(KernelError::InvalidGraph(format!(
                        "node {} lists prerequisite {} twice",
                        node.id, prereq
                    )));
                }
            }
        }

        Ok(Self { nodes, index })
    }

    /// Parses a JSON array of nodes.
    pub fn from_json(raw: &str) -> Result<Self> {
        let nodes: Vec<SkillNode> =
            serde_json::from_str(raw).map_err(|e| KernelError::InvalidGraph(e.to_string()))?;
        Self::new(nodes)
    }

    pub fn get(&self, id: &NodeId) -> Option<&SkillNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Nodes in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillNode> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
