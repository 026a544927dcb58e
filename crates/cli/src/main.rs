use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use skillpath_cli::commands::{attempt, inspect, reset, state, timeline, verify, Target};

#[derive(Parser)]
#[command(name = "skillpath")]
#[command(about = "Skillpath CLI - inspect, verify and replay a learner event log", long_about = None)]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Emit logs to stderr (filter with RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct TargetArgs {
    /// JSON config file (namespace, data_dir, scoring rules)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of the file-backed store (overrides config)
    #[arg(long, short, global = true)]
    dir: Option<PathBuf>,

    /// Storage namespace prefix (overrides config)
    #[arg(long, global = true)]
    namespace: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the status of every log slot without modifying anything
    Inspect,
    /// Read the log through the recovery path, restoring the backup if needed
    Verify,
    /// List events in replay order
    Timeline {
        /// Only show this user's events
        #[arg(long, short)]
        user: Option<String>,
    },
    /// Derive and print a user's state
    State {
        user: String,

        /// Content graph JSON; adds the skill map
        #[arg(long, short)]
        graph: Option<PathBuf>,
    },
    /// Submit an attempt for a node
    Attempt {
        /// Content graph JSON
        #[arg(long, short)]
        graph: PathBuf,

        #[arg(long, short)]
        user: String,

        #[arg(long, short)]
        node: String,

        #[arg(long, short)]
        answer: String,

        /// Submission id; the same id is only processed once
        #[arg(long, short)]
        submission: String,

        #[arg(long, default_value_t = 0)]
        hints: u32,

        #[arg(long, default_value_t = 0)]
        time_ms: u64,

        /// Ignore prerequisites
        #[arg(long = "override")]
        override_mode: bool,
    },
    /// Erase every slot of the namespace
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> anyhow::Result<()> {
    println!(r#"
     _    _ _ _             _   _
 ___| | _(_) | |_ __   __ _| |_| |__
/ __| |/ / | | | '_ \ / _` | __| '_ \
\__ \   <| | | | |_) | (_| | |_| | | |
|___/_|\_\_|_|_| .__/ \__,_|\__|_| |_|
               |_|
   Skillpath Log Tool v0.1.0
    "#);

    let cli = Cli::parse();
    if cli.verbose {
        skillpath_node::telemetry::init_telemetry();
    }

    let target = Target {
        config: cli.target.config,
        dir: cli.target.dir,
        namespace: cli.target.namespace,
    };

    let outcome = match cli.command {
        Commands::Inspect => inspect::run(&target),
        Commands::Verify => verify::run(&target),
        Commands::Timeline { user } => timeline::run(&target, user.as_deref()),
        Commands::State { user, graph } => state::run(&target, &user, graph.as_deref()),
        Commands::Attempt {
            graph,
            user,
            node,
            answer,
            submission,
            hints,
            time_ms,
            override_mode,
        } => attempt::run(
            &target,
            attempt::AttemptArgs {
                graph: &graph,
                user: &user,
                node: &node,
                answer: &answer,
                submission: &submission,
                hints,
                time_spent_ms: time_ms,
                override_mode,
            },
        )
        .map(|_| ()),
        Commands::Reset { yes } => reset::run(&target, yes),
    };

    if cli.verbose {
        eprintln!("{}", skillpath_node::telemetry::get_metrics());
    }
    outcome
}
