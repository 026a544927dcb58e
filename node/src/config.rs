// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use skillpath_kernel::config::ScoringRules;
use skillpath_kernel::event::EventMetadata;

use crate::errors::ConfigError;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Prefix for every storage slot of the event log.
    pub namespace: String,
    /// Root of the file-backed store, when one is used.
    pub data_dir: Option<PathBuf>,
    pub client_name: String,
    pub client_version: String,
    /// Unlock every node regardless of prerequisites.
    pub override_mode: bool,
    pub scoring: ScoringRules,
    /// Enables `MilestoneCelebrations`; otherwise no celebrations fire.
    pub celebrations: bool,
    pub streak_milestones: Vec<u32>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            namespace: "skillpath:".to_string(),
            data_dir: None,
            client_name: "skillpath-node".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            override_mode: false,
            scoring: ScoringRules::default(),
            celebrations: false,
            streak_milestones: vec![5, 10, 25, 50, 100],
        }
    }
}

impl NodeConfig {
    /// Loads a JSON config; absent fields keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: NodeConfig = serde_json::from_str(&raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::Invalid("namespace must not be empty".into()));
        }
        if self.scoring.xp_per_level == 0 {
            return Err(ConfigError::Invalid("scoring.xp_per_level must be positive".into()));
        }
        if !(self.scoring.numeric_tolerance >= 0.0) {
            return Err(ConfigError::Invalid("scoring.numeric_tolerance must be non-negative".into()));
        }
        Ok(())
    }

    pub fn event_metadata(&self) -> EventMetadata {
        EventMetadata {
            client: self.client_name.clone(),
            version: self.client_version.clone(),
        }
    }
}
