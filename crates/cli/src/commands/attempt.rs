use std::path::Path;

use skillpath_kernel::graph::AnswerValue;
use skillpath_kernel::types::id::{NodeId, UserId};
use skillpath_node::clock::SystemClock;
use skillpath_node::engine::build_session;
use skillpath_node::session::{AttemptInput, CompletionResult};

use super::{load_graph, Target};

pub struct AttemptArgs<'a> {
    pub graph: &'a Path,
    pub user: &'a str,
    pub node: &'a str,
    pub answer: &'a str,
    pub submission: &'a str,
    pub hints: u32,
    pub time_spent_ms: u64,
    pub override_mode: bool,
}

/// Submits one attempt through the session orchestrator and prints the result as JSON.
pub fn run(target: &Target, args: AttemptArgs<'_>) -> anyhow::Result<CompletionResult> {
    let mut cfg = target.resolve()?;
    cfg.override_mode |= args.override_mode;
    let store = target.open_store(&cfg)?;
    let mut session = build_session(&cfg, store, load_graph(args.graph)?, Box::new(SystemClock));

    let input = AttemptInput {
        answer: AnswerValue::Text(args.answer.to_string()),
        time_spent_ms: args.time_spent_ms,
        hints_used: args.hints,
        submission_id: args.submission.to_string(),
    };
    let result = session.complete_attempt(&UserId::new(args.user), &NodeId::new(args.node), input)?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(result)
}
