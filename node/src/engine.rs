// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Composition root: builds each component once and wires them explicitly.

use skillpath_kernel::graph::SkillGraph;
use skillpath_kernel::policy::{AccessPolicy, PolicyOptions};
use skillpath_kernel::replay::StateDeriver;

use crate::celebration::{CelebrationPolicy, MilestoneCelebrations, NoCelebrations};
use crate::clock::Clock;
use crate::config::NodeConfig;
use crate::events::event_log::DurableLogStore;
use crate::events::recorder::EventRecorder;
use crate::session::SessionOrchestrator;
use crate::storage::KeyValueStore;

/// Builds a session over `store` for the given content graph.
pub fn build_session<S: KeyValueStore>(
    cfg: &NodeConfig,
    store: S,
    graph: SkillGraph,
    clock: Box<dyn Clock + Send + Sync>,
) -> SessionOrchestrator<S> {
    tracing::info!(
        namespace = %cfg.namespace,
        nodes = graph.len(),
        override_mode = cfg.override_mode,
        "Initializing session"
    );

    let log = DurableLogStore::open(store, &cfg.namespace, clock);
    let recorder = EventRecorder::new(log, cfg.event_metadata());
    let deriver = StateDeriver::new(cfg.scoring.clone());

    let mut policy = AccessPolicy::new(graph);
    policy.configure(PolicyOptions { override_mode: cfg.override_mode });

    let celebrations: Box<dyn CelebrationPolicy + Send + Sync> = if cfg.celebrations {
        Box::new(MilestoneCelebrations::new(cfg.streak_milestones.clone()))
    } else {
        Box::new(NoCelebrations)
    };

    SessionOrchestrator::new(recorder, deriver, policy, celebrations)
}
