use std::path::Path;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use skillpath_kernel::replay::StateDeriver;
use skillpath_kernel::types::id::UserId;
use skillpath_kernel::verify::hex_fingerprint;
use skillpath_node::clock::SystemClock;
use skillpath_node::engine::build_session;
use skillpath_node::events::event_log::DurableLogStore;

use super::{load_graph, Target};

/// Derives a user's state from the log. With a graph, also prints the skill map.
pub fn run(target: &Target, user: &str, graph: Option<&Path>) -> anyhow::Result<()> {
    let user = UserId::new(user);
    let cfg = target.resolve()?;
    let store = target.open_store(&cfg)?;

    let (state, map) = match graph {
        Some(path) => {
            let mut session = build_session(&cfg, store, load_graph(path)?, Box::new(SystemClock));
            (session.user_state(&user)?, Some(session.skill_map(&user)?))
        }
        None => {
            let mut log = DurableLogStore::open(store, &cfg.namespace, Box::new(SystemClock));
            let history: Vec<_> = log.read_all()?.into_iter().filter(|e| e.user_id == user).collect();
            (StateDeriver::new(cfg.scoring.clone()).derive(&history, None), None)
        }
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Field", "Value"]);
    table.add_row(vec!["User".to_string(), user.to_string()]);
    table.add_row(vec!["XP".to_string(), state.xp.to_string()]);
    table.add_row(vec!["Level".to_string(), state.level.to_string()]);
    table.add_row(vec!["XP to next level".to_string(), state.xp_to_next_level.to_string()]);
    table.add_row(vec!["Streak".to_string(), state.streak.to_string()]);
    table.add_row(vec!["Completed".to_string(), state.completed_nodes.len().to_string()]);
    table.add_row(vec!["Attempted".to_string(), state.attempted_nodes.len().to_string()]);
    table.add_row(vec![
        "Last event".to_string(),
        state
            .last_processed_event_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".into()),
    ]);
    table.add_row(vec!["Fingerprint".to_string(), hex_fingerprint(&state.fingerprint())]);

    println!("\nUser State\n");
    println!("{table}\n");

    if let Some(map) = map {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec!["Node", "State"]);
        for (node, visual) in map {
            table.add_row(vec![node.to_string(), format!("{:?}", visual)]);
        }
        println!("Skill Map\n");
        println!("{table}\n");
    }

    Ok(())
}
