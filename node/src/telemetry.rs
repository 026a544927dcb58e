// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics). Safe to call more than once.
pub fn init_telemetry() {
    // 1. Initialize Tracing (Logs)
    let installed = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "skillpath_node=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
    if let Err(e) = installed {
        tracing::debug!("Tracing subscriber already installed: {}", e);
    }

    // 2. Initialize Metrics (Prometheus)
    if PROM_HANDLE.get().is_some() {
        tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
        return;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::debug!("Prometheus handle raced with another initializer");
            }
        }
        Err(e) => {
            tracing::warn!("Metrics recorder not installed: {}", e);
            return;
        }
    }

    metrics::describe_counter!("skillpath_events_appended_total", "Total number of events appended to the log");
    metrics::describe_counter!("skillpath_write_rollbacks_total", "Appends rolled back to the pre-write backup");
    metrics::describe_counter!("skillpath_log_recoveries_total", "Reads that failed verification and tried the backup");
    metrics::describe_counter!("skillpath_attempts_total", "Attempt submissions received");
    metrics::describe_histogram!("skillpath_derive_duration_seconds", "Time taken to derive user state");
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_telemetry_is_repeatable() {
        init_telemetry();
        init_telemetry();

        metrics::counter!("skillpath_attempts_total", 1);
        let rendered = get_metrics();
        assert!(!rendered.contains("not initialized"), "{rendered}");
    }
}
