// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Namespaced key-value storage seam.
//!
//! The durable log only ever talks to a `KeyValueStore`. Which implementation
//! backs it is the caller's decision:
//! - `MemoryStore`: tests and hosts without persistent storage
//! - `FileStore`: one file per key under a data directory

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage quota exceeded writing {key} ({needed} bytes)")]
    QuotaExceeded { key: String, needed: usize },

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Minimal string key-value store, the shape of browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn put(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
