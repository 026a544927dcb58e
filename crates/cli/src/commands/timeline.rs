use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use skillpath_kernel::types::id::UserId;

use super::{format_millis, Target};

fn flag(value: Option<bool>) -> String {
    match value {
        Some(true) => "yes".into(),
        Some(false) => "no".into(),
        None => "-".into(),
    }
}

/// Lists events in replay order, optionally for one user.
pub fn run(target: &Target, user: Option<&str>) -> anyhow::Result<()> {
    let (_, mut log) = target.open_log()?;
    let mut events = log.read_all()?;
    if let Some(user) = user {
        let user = UserId::new(user);
        events.retain(|e| e.user_id == user);
    }

    let in_order = events.windows(2).all(|w| w[0].replay_key() <= w[1].replay_key());
    if !in_order {
        println!("\n⚠️  WARNING: Stored order differs from timestamps. Displaying replay order.\n");
        events.sort_by_key(|e| e.replay_key());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["ID", "Timestamp", "User", "Type", "Node", "Correct", "Score"]);

    for event in &events {
        table.add_row(vec![
            event.id.to_string(),
            format_millis(event.timestamp),
            event.user_id.to_string(),
            event.event_type.as_str().to_string(),
            event.node_id().map(|n| n.to_string()).unwrap_or_else(|| "-".into()),
            flag(event.payload.correct),
            event
                .payload
                .score_awarded
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".into()),
        ]);
    }

    println!("\nEvent Timeline ({} events)\n", events.len());
    println!("{table}\n");

    Ok(())
}
