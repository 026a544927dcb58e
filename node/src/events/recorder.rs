// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event Recorder
//!
//! Turns "user did X" into a canonical `EventDraft` and hands it to the
//! durable log. No retries here; log errors propagate unchanged.

use skillpath_kernel::event::{Event, EventDraft, EventMetadata, EventPayload};
use skillpath_kernel::types::enums::EventType;
use skillpath_kernel::types::id::{EventId, UserId};
use thiserror::Error;

use crate::events::event_log::{DurableLogStore, StoreError};
use crate::storage::KeyValueStore;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, RecordError>;

pub struct EventRecorder<S: KeyValueStore> {
    log: DurableLogStore<S>,
    metadata: EventMetadata,
}

impl<S: KeyValueStore> EventRecorder<S> {
    /// `metadata` is stamped onto every recorded event.
    pub fn new(log: DurableLogStore<S>, metadata: EventMetadata) -> Self {
        Self { log, metadata }
    }

    pub fn record(&mut self, user_id: &UserId, event_type: EventType, payload: EventPayload) -> Result<EventId> {
        if user_id.is_blank() {
            return Err(RecordError::InvalidEvent("userId is required".into()));
        }
        if event_type.as_str().trim().is_empty() {
            return Err(RecordError::InvalidEvent("event type is required".into()));
        }

        let draft = EventDraft {
            user_id: user_id.clone(),
            event_type,
            payload,
            metadata: self.metadata.clone(),
        };
        let id = self.log.append(draft)?;
        tracing::debug!(user = %user_id, event_id = %id, "Event recorded");
        Ok(id)
    }

    /// The user's events in insertion order.
    pub fn history(&mut self, user_id: &UserId) -> Result<Vec<Event>> {
        Ok(self
            .log
            .read_all()?
            .into_iter()
            .filter(|e| &e.user_id == user_id)
            .collect())
    }

    pub fn log_mut(&mut self) -> &mut DurableLogStore<S> {
        &mut self.log
    }
}
