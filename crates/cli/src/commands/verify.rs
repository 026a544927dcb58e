use skillpath_node::events::event_log::StoreError;

use super::Target;

/// Reads the log through the recovery path. Heals from the backup when the
/// committed batch is bad; fails if nothing usable remains.
pub fn run(target: &Target) -> anyhow::Result<()> {
    let (cfg, mut log) = target.open_log()?;
    let before = log.integrity_report()?;

    match log.read_all() {
        Ok(events) => {
            let ids_ordered = events.windows(2).all(|w| w[0].id < w[1].id);
            if !before.is_healthy() {
                println!("⚠️  Committed batch was corrupt; restored from backup.");
            }
            println!("✅ Log {} verified: {} events", cfg.namespace, events.len());
            if !ids_ordered {
                println!("⚠️  Event ids are not strictly increasing in insertion order.");
            }
            if let Some(last) = events.last() {
                println!("   Latest event: {}", last.id);
            }
            Ok(())
        }
        Err(StoreError::CorruptionUnrecoverable { reason }) => {
            println!("❌ Log {} is corrupt and no usable backup exists.", cfg.namespace);
            println!("   Reason: {}", reason);
            println!("   Use `skillpath reset --yes` to discard it.");
            anyhow::bail!("unrecoverable event log: {reason}")
        }
        Err(e) => Err(e.into()),
    }
}
