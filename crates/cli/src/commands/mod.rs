pub mod attempt;
pub mod inspect;
pub mod reset;
pub mod state;
pub mod timeline;
pub mod verify;

use std::path::{Path, PathBuf};

use anyhow::Context;
use skillpath_kernel::graph::SkillGraph;
use skillpath_node::clock::SystemClock;
use skillpath_node::config::NodeConfig;
use skillpath_node::events::event_log::DurableLogStore;
use skillpath_node::storage::FileStore;

/// Where a command finds its event log.
#[derive(Clone, Debug, Default)]
pub struct Target {
    pub config: Option<PathBuf>,
    pub dir: Option<PathBuf>,
    pub namespace: Option<String>,
}

impl Target {
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            ..Default::default()
        }
    }

    /// Config file (or defaults) with `--dir`/`--namespace` applied on top.
    pub fn resolve(&self) -> anyhow::Result<NodeConfig> {
        let mut cfg = match &self.config {
            Some(path) => NodeConfig::from_json_file(path)?,
            None => NodeConfig::default(),
        };
        if let Some(dir) = &self.dir {
            cfg.data_dir = Some(dir.clone());
        }
        if let Some(ns) = &self.namespace {
            cfg.namespace = ns.clone();
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn open_store(&self, cfg: &NodeConfig) -> anyhow::Result<FileStore> {
        let dir = cfg
            .data_dir
            .as_ref()
            .context("no data directory: pass --dir or set data_dir in the config")?;
        Ok(FileStore::open(dir)?)
    }

    pub fn open_log(&self) -> anyhow::Result<(NodeConfig, DurableLogStore<FileStore>)> {
        let cfg = self.resolve()?;
        let store = self.open_store(&cfg)?;
        let log = DurableLogStore::open(store, &cfg.namespace, Box::new(SystemClock));
        Ok((cfg, log))
    }
}

pub fn load_graph(path: &Path) -> anyhow::Result<SkillGraph> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading graph {}", path.display()))?;
    Ok(SkillGraph::from_json(&raw)?)
}

pub(crate) fn format_millis(millis: u64) -> String {
    chrono::DateTime::from_timestamp_millis(millis as i64)
        .unwrap_or_default()
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}
