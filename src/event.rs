// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Log as Primary Truth
//!
//! This module defines the canonical event record. Every change to a user's
//! progress is expressed as an `Event`; `UserState` is only ever derived
//! from a sequence of them.
//!
//! # Invariants
//! - Events are immutable once appended
//! - Same event sequence => same derived state
//! - `timestamp` equals `id.millis`, so timestamp order and id order agree

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::enums::EventType;
use crate::types::id::{EventId, NodeId, UserId};

/// Type-specific event data. Fields a fold rule does not know about are kept
/// in `extra` so that re-serializing never drops them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_awarded: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_spent_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hints_used: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl EventPayload {
    pub fn for_node(node_id: NodeId) -> Self {
        Self {
            node_id: Some(node_id),
            ..Default::default()
        }
    }
}

/// Provenance only. Derivation never reads it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    pub client: String,
    pub version: String,
}

/// An event before the log store has stamped it.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDraft {
    pub user_id: UserId,
    pub event_type: EventType,
    pub payload: EventPayload,
    pub metadata: EventMetadata,
}

/// Canonical persisted event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub payload: EventPayload,
    /// Unix milliseconds.
    pub timestamp: u64,
    #[serde(default)]
    pub metadata: EventMetadata,
}

impl Event {
    pub fn from_draft(draft: EventDraft, id: EventId) -> Self {
        Self {
            id,
            user_id: draft.user_id,
            event_type: draft.event_type,
            payload: draft.payload,
            timestamp: id.millis,
            metadata: draft.metadata,
        }
    }

    /// Key used by full replay: timestamp first, id as tiebreaker.
    pub fn replay_key(&self) -> (u64, EventId) {
        (self.timestamp, self.id)
    }

    pub fn node_id(&self) -> Option<&NodeId> {
        self.payload.node_id.as_ref()
    }
}
