// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Event-Sourced Persistence Layer
//!
//! # Architecture
//! - Event Log = Primary truth (append-only, checksummed, single backup)
//! - Recorder = Validation and stamping in front of the log
//! - State cache = Derived snapshots (disposable)
//!
//! # Guarantees
//! - A failed append leaves the committed batch as it was
//! - Corruption is repaired from the backup or reported, never hidden

pub mod event_log;
pub mod id_gen;
pub mod recorder;
pub mod state_cache;

pub use event_log::{DurableLogStore, IntegrityReport, LogSlots, SlotStatus, StoreError};
pub use id_gen::IdGenerator;
pub use recorder::{EventRecorder, RecordError};
pub use state_cache::StateCache;
