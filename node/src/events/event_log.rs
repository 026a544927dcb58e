// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Durable Log Store
//!
//! This is the CANONICAL durability layer.
//! - The whole event batch is one JSON array per namespace
//! - Every committed batch is paired with a CRC-64 of its exact bytes
//! - A single-level backup holds the previously committed pair
//! - Events are never rewritten, except by restoring the backup
//!
//! # Slot Layout
//! ```text
//! {prefix}events            committed batch
//! {prefix}checksum          CRC-64 of committed batch (16 hex digits)
//! {prefix}backup            previous committed batch
//! {prefix}backup_checksum   CRC-64 of previous batch
//! {prefix}staging           batch being written (transient)
//! ```
//!
//! # Commit Protocol
//! 1. Copy committed pair into the backup slots
//! 2. Write new batch to staging
//! 3. Write new checksum
//! 4. Write new batch to the committed slot
//! 5. Clear staging
//!
//! A failure in 2-4 restores the committed pair from the backup and the
//! caller gets `WriteError`. A checksum mismatch on read restores from the
//! backup once; if that is unusable too the caller gets
//! `CorruptionUnrecoverable`. An empty result is only ever returned for a
//! namespace that has never held events.

use crc64fast::Digest;
use skillpath_kernel::event::{Event, EventDraft};
use skillpath_kernel::types::id::EventId;
use thiserror::Error;

use crate::clock::Clock;
use crate::events::id_gen::IdGenerator;
use crate::storage::{KeyValueStore, StorageError};

#[derive(Error, Debug)]
pub enum StoreError {
    /// The write did not become durable. With `restored` the committed
    /// state is exactly what it was before the call.
    #[error("Event log write failed (restored: {restored}): {source}")]
    WriteError {
        restored: bool,
        #[source]
        source: StorageError,
    },

    #[error("Event log corrupted and no usable backup: {reason}")]
    CorruptionUnrecoverable { reason: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage keys for one namespace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSlots {
    pub events: String,
    pub checksum: String,
    pub backup: String,
    pub backup_checksum: String,
    pub staging: String,
}

impl LogSlots {
    pub fn new(prefix: &str) -> Self {
        Self {
            events: format!("{prefix}events"),
            checksum: format!("{prefix}checksum"),
            backup: format!("{prefix}backup"),
            backup_checksum: format!("{prefix}backup_checksum"),
            staging: format!("{prefix}staging"),
        }
    }

    pub fn all(&self) -> [&str; 5] {
        [&self.events, &self.checksum, &self.backup, &self.backup_checksum, &self.staging]
    }
}

/// CRC-64 of a serialized batch, as stored in the checksum slots.
pub fn batch_checksum(serialized: &str) -> String {
    let mut digest = Digest::new();
    digest.write(serialized.as_bytes());
    format!("{:016x}", digest.sum64())
}

/// Verification result for a batch/checksum slot pair.
#[derive(Clone, Debug, PartialEq)]
pub enum SlotStatus {
    Absent,
    Valid { events: usize, bytes: usize },
    Invalid { reason: String },
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntegrityReport {
    pub committed: SlotStatus,
    pub backup: SlotStatus,
    pub staging_present: bool,
}

impl IntegrityReport {
    pub fn is_healthy(&self) -> bool {
        !matches!(self.committed, SlotStatus::Invalid { .. })
    }
}

enum Verified {
    Absent,
    Valid(Vec<Event>),
    Invalid(String),
}

fn verify_pair(batch: Option<&str>, checksum: Option<&str>) -> Verified {
    match (batch, checksum) {
        (None, None) => Verified::Absent,
        (Some(_), None) => Verified::Invalid("checksum slot missing".into()),
        (None, Some(_)) => Verified::Invalid("batch slot missing".into()),
        (Some(batch), Some(stored)) => {
            let computed = batch_checksum(batch);
            if computed != stored.trim() {
                return Verified::Invalid(format!(
                    "checksum mismatch: stored {}, computed {}",
                    stored.trim(),
                    computed
                ));
            }
            match serde_json::from_str::<Vec<Event>>(batch) {
                Ok(events) => Verified::Valid(events),
                Err(e) => Verified::Invalid(format!("batch does not parse: {e}")),
            }
        }
    }
}

/// Append-only event log over a `KeyValueStore`.
///
/// Holds the last verified batch in memory; `read_all` always re-reads and
/// re-verifies storage.
pub struct DurableLogStore<S: KeyValueStore> {
    store: S,
    slots: LogSlots,
    clock: Box<dyn Clock + Send + Sync>,
    ids: IdGenerator,
    cache: Option<Vec<Event>>,
}

impl<S: KeyValueStore> DurableLogStore<S> {
    /// Binds a store to a namespace. Nothing is read until first use.
    pub fn open(store: S, prefix: &str, clock: Box<dyn Clock + Send + Sync>) -> Self {
        tracing::info!("Opening event log namespace {:?}", prefix);
        Self {
            store,
            slots: LogSlots::new(prefix),
            clock,
            ids: IdGenerator::new(),
            cache: None,
        }
    }

    pub fn storage(&self) -> &S {
        &self.store
    }

    /// Direct storage access. Writes here bypass the commit protocol.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Stamps `draft` with a fresh id and commits the extended batch.
    pub fn append(&mut self, draft: EventDraft) -> Result<EventId> {
        let mut events = match self.cache.take() {
            Some(events) => events,
            None => self.read_all()?,
        };
        self.cache = None;

        let id = self.ids.next(self.clock.now_millis());
        events.push(Event::from_draft(draft, id));

        let serialized = match serde_json::to_string(&events) {
            Ok(s) => s,
            Err(e) => {
                events.pop();
                self.cache = Some(events);
                return Err(e.into());
            }
        };
        let checksum = batch_checksum(&serialized);

        match self.commit(&serialized, &checksum) {
            Ok(()) => {
                tracing::debug!(event_id = %id, total = events.len(), "Event appended");
                metrics::counter!("skillpath_events_appended_total", 1);
                self.cache = Some(events);
                Ok(id)
            }
            Err(e) => {
                events.pop();
                if let StoreError::WriteError { restored: true, .. } = e {
                    self.cache = Some(events);
                }
                Err(e)
            }
        }
    }

    fn commit(&mut self, serialized: &str, checksum: &str) -> Result<()> {
        let previous_batch = self.store.get(&self.slots.events)?;
        let previous_sum = self.store.get(&self.slots.checksum)?;

        // 1. Backup. The committed slots are untouched if this fails.
        if let Err(source) = self.write_backup(previous_batch.as_deref(), previous_sum.as_deref()) {
            tracing::warn!("Backup write failed, nothing committed: {}", source);
            return Err(StoreError::WriteError { restored: true, source });
        }

        // 2-4. Staging, checksum, permanent slot.
        if let Err(source) = self.write_new(serialized, checksum) {
            metrics::counter!("skillpath_write_rollbacks_total", 1);
            tracing::warn!("Commit failed, restoring backup: {}", source);
            return match self.restore_committed(previous_batch.as_deref(), previous_sum.as_deref()) {
                Ok(()) => Err(StoreError::WriteError { restored: true, source }),
                Err(restore_err) => {
                    tracing::error!("CRITICAL: backup restore failed after write failure: {}", restore_err);
                    Err(StoreError::WriteError { restored: false, source })
                }
            };
        }

        // 5. The batch is committed; a leftover staging slot is cleared on next read.
        if let Err(e) = self.store.remove(&self.slots.staging) {
            tracing::warn!("Failed to clear staging slot: {}", e);
        }
        Ok(())
    }

    fn write_new(&mut self, serialized: &str, checksum: &str) -> std::result::Result<(), StorageError> {
        self.store.put(&self.slots.staging, serialized)?;
        self.store.put(&self.slots.checksum, checksum)?;
        self.store.put(&self.slots.events, serialized)
    }

    fn write_backup(&mut self, batch: Option<&str>, sum: Option<&str>) -> std::result::Result<(), StorageError> {
        match (batch, sum) {
            (Some(batch), Some(sum)) => {
                self.store.put(&self.slots.backup, batch)?;
                self.store.put(&self.slots.backup_checksum, sum)
            }
            _ => {
                self.store.remove(&self.slots.backup)?;
                self.store.remove(&self.slots.backup_checksum)
            }
        }
    }

    fn restore_committed(&mut self, batch: Option<&str>, sum: Option<&str>) -> std::result::Result<(), StorageError> {
        match (batch, sum) {
            (Some(batch), Some(sum)) => {
                self.store.put(&self.slots.events, batch)?;
                self.store.put(&self.slots.checksum, sum)?;
            }
            _ => {
                self.store.remove(&self.slots.events)?;
                self.store.remove(&self.slots.checksum)?;
            }
        }
        self.store.remove(&self.slots.staging)
    }

    /// Loads and verifies the committed batch, healing from the backup once
    /// if it fails verification.
    pub fn read_all(&mut self) -> Result<Vec<Event>> {
        self.cache = None;
        let batch = self.store.get(&self.slots.events)?;
        let sum = self.store.get(&self.slots.checksum)?;

        let events = match verify_pair(batch.as_deref(), sum.as_deref()) {
            Verified::Valid(events) => events,
            Verified::Absent => {
                let backup = self.store.get(&self.slots.backup)?;
                if backup.is_some() {
                    self.recover("committed slots missing while a backup exists".into())?
                } else {
                    Vec::new()
                }
            }
            Verified::Invalid(reason) => self.recover(reason)?,
        };

        if self.store.get(&self.slots.staging)?.is_some() {
            tracing::warn!("Clearing staging slot left by an interrupted append");
            self.store.remove(&self.slots.staging)?;
        }

        if let Some(last) = events.iter().map(|e| e.id).max() {
            self.ids.observe(last);
        }
        self.cache = Some(events.clone());
        Ok(events)
    }

    fn recover(&mut self, reason: String) -> Result<Vec<Event>> {
        tracing::warn!("Event log failed verification ({}). Attempting backup restore.", reason);
        metrics::counter!("skillpath_log_recoveries_total", 1);

        let backup = self.store.get(&self.slots.backup)?;
        let backup_sum = self.store.get(&self.slots.backup_checksum)?;

        match verify_pair(backup.as_deref(), backup_sum.as_deref()) {
            Verified::Valid(events) => {
                if let (Some(batch), Some(sum)) = (backup.as_deref(), backup_sum.as_deref()) {
                    self.store.put(&self.slots.events, batch)?;
                    self.store.put(&self.slots.checksum, sum)?;
                }
                tracing::info!("Event log restored from backup ({} events)", events.len());
                Ok(events)
            }
            Verified::Absent => {
                tracing::error!("Event log corrupted and no backup exists: {}", reason);
                Err(StoreError::CorruptionUnrecoverable { reason })
            }
            Verified::Invalid(backup_reason) => {
                tracing::error!("Event log and backup both corrupted: {} / {}", reason, backup_reason);
                Err(StoreError::CorruptionUnrecoverable {
                    reason: format!("{reason}; backup: {backup_reason}"),
                })
            }
        }
    }

    /// Events strictly after `after`. An unknown id yields the full batch so
    /// a stale consumer re-reads everything instead of silently missing events.
    pub fn read_since(&mut self, after: EventId) -> Result<Vec<Event>> {
        let events = self.read_all()?;
        match events.iter().position(|e| e.id == after) {
            Some(pos) => Ok(events[pos + 1..].to_vec()),
            None => {
                tracing::debug!(%after, "read_since: id not found, returning full batch");
                Ok(events)
            }
        }
    }

    /// Newest id in the verified batch.
    pub fn latest_event_id(&mut self) -> Result<Option<EventId>> {
        if self.cache.is_none() {
            self.read_all()?;
        }
        Ok(self.cache.as_ref().and_then(|events| events.iter().map(|e| e.id).max()))
    }

    pub fn len(&mut self) -> Result<usize> {
        if self.cache.is_none() {
            self.read_all()?;
        }
        Ok(self.cache.as_ref().map_or(0, Vec::len))
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Erases every slot of the namespace. Only for an explicit caller
    /// decision, typically after `CorruptionUnrecoverable`.
    pub fn reset(&mut self) -> Result<()> {
        tracing::info!("Resetting event log namespace ({})", self.slots.events);
        for key in self.slots.all() {
            self.store.remove(key)?;
        }
        self.cache = Some(Vec::new());
        Ok(())
    }

    /// Per-slot verification without touching storage.
    pub fn integrity_report(&self) -> Result<IntegrityReport> {
        let status = |batch: Option<String>, sum: Option<String>| -> SlotStatus {
            let bytes = batch.as_ref().map_or(0, String::len);
            match verify_pair(batch.as_deref(), sum.as_deref()) {
                Verified::Absent => SlotStatus::Absent,
                Verified::Valid(events) => SlotStatus::Valid { events: events.len(), bytes },
                Verified::Invalid(reason) => SlotStatus::Invalid { reason },
            }
        };

        Ok(IntegrityReport {
            committed: status(self.store.get(&self.slots.events)?, self.store.get(&self.slots.checksum)?),
            backup: status(self.store.get(&self.slots.backup)?, self.store.get(&self.slots.backup_checksum)?),
            staging_present: self.store.get(&self.slots.staging)?.is_some(),
        })
    }
}
