use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use skillpath_node::events::event_log::SlotStatus;

use super::Target;

fn status_row(slot: &str, status: &SlotStatus) -> Vec<String> {
    match status {
        SlotStatus::Absent => vec![slot.to_string(), "MISSING".into(), String::new()],
        SlotStatus::Valid { events, bytes } => vec![
            slot.to_string(),
            "OK".into(),
            format!("{} events, {} bytes", events, bytes),
        ],
        SlotStatus::Invalid { reason } => vec![slot.to_string(), "CORRUPT".into(), reason.clone()],
    }
}

/// Read-only slot report. Never repairs anything.
pub fn run(target: &Target) -> anyhow::Result<()> {
    let (cfg, log) = target.open_log()?;
    let report = log.integrity_report()?;

    println!("\nSkillpath Log Status ({})", cfg.namespace);
    println!("--------------------");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Slot", "Status", "Details"]);

    table.add_row(status_row("Committed", &report.committed));
    table.add_row(status_row("Backup", &report.backup));
    table.add_row(vec![
        "Staging".to_string(),
        if report.staging_present { "PRESENT" } else { "CLEAR" }.to_string(),
        if report.staging_present {
            "interrupted append, cleared on next read".to_string()
        } else {
            String::new()
        },
    ]);

    println!("{table}\n");

    if !report.is_healthy() {
        println!("⚠️  Committed batch fails verification. Run `skillpath verify` to attempt a backup restore.\n");
    }
    Ok(())
}
