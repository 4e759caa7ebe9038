use clap::{Parser, Subcommand};

/// Process-level arguments. The board lives in memory only, so the binary
/// always runs as an interactive session; there are no one-shot subcommands.
#[derive(Parser, Debug)]
#[command(author, version, about = "In-memory Web3 task board with a simulated wallet", long_about = None)]
pub struct Cli {
    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Start from the sample board instead of an empty one
    #[arg(long)]
    pub demo: bool,

    /// Simulated wallet connect delay in milliseconds
    #[arg(long, value_name = "MS")]
    pub connect_delay_ms: Option<u64>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE")]
    pub config_override: Vec<String>,
}

/// One line of the interactive session.
#[derive(Parser, Debug)]
#[command(name = "web3todo", about = "Session commands", long_about = None)]
pub struct Line {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect the simulated wallet
    Connect,
    /// Add a task with a staked wei value
    ///
    /// Example: add "Ship docs" "Write the release docs" 1000000000000000000
    Add {
        name: Option<String>,
        description: Option<String>,
        wei_value: Option<String>,
    },
    /// Mark a task as completed
    ///
    /// Example: done task-1
    Done {
        id: String,
    },
    /// Show details of a task
    ///
    /// Example: show task-1
    Show {
        id: String,
    },
    /// List tasks in creation order
    List,
    /// Show dashboard counters and the total stake
    Summary,
}
