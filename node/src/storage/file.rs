// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! File-backed store: one file per key.
//!
//! Writes go to a temp file that is fsync'd and renamed over the target, so
//! a key holds either its old or its new value, never a torn one.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::{KeyValueStore, Result};

#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Path backing `key`.
    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(encode_key(key))
    }
}

/// Maps a key onto a portable file name. Bytes outside `[A-Za-z0-9._-]`
/// become `%XX`, so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut name = String::with_capacity(key.len());
    for b in key.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => name.push(b as char),
            other => name.push_str(&format!("%{:02X}", other)),
        }
    }
    name
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        let target = self.path_for(key);
        // `~` is always escaped by `encode_key`, so this never names a key.
        let tmp = self.dir.join(format!("~{}.tmp", encode_key(key)));

        {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &target)?;

        // Persist the rename itself. Directory fsync is unsupported on some
        // platforms; the data is already durable in that case.
        match File::open(&self.dir).and_then(|dir| dir.sync_all()) {
            Ok(()) => {}
            Err(e) => tracing::debug!("Directory fsync skipped for {:?}: {}", self.dir, e),
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
