//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "kt",
    version,
    about = "Find out why a Kubernetes pod is failing",
    long_about = None,
)]
pub struct Cli {
    /// Kubernetes context to use
    #[arg(long, global = true, env = "KT_CONTEXT")]
    pub context: Option<String>,

    /// Namespace to use
    #[arg(short = 'n', long, global = true, env = "KT_NAMESPACE")]
    pub namespace: Option<String>,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose logging
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Html,
}

#[derive(Subcommand)]
pub enum Command {
    /// Diagnose a single pod
    #[command(alias = "diag")]
    Diagnose(DiagnoseArgs),

    /// Watch pods and re-diagnose on state changes
    #[command(alias = "mon")]
    Monitor(MonitorArgs),

    /// List stored diagnosis reports
    Reports(ReportsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct DiagnoseArgs {
    /// Pod name
    pub pod: String,

    /// Number of log lines to inspect per container
    #[arg(long)]
    pub tail: Option<i64>,

    /// Event recency window (e.g., 1h, 30m)
    #[arg(long)]
    pub window: Option<String>,

    /// Maximum number of events to include
    #[arg(long)]
    pub events: Option<usize>,

    /// Directory to write HTML reports into
    #[arg(long)]
    pub report_dir: Option<String>,
}

#[derive(Args)]
pub struct MonitorArgs {
    /// Filter by labels (key=value)
    #[arg(short = 'l', long)]
    pub selector: Option<String>,

    /// Watch resync interval (e.g., 10m)
    #[arg(long)]
    pub resync: Option<String>,

    /// Cooldown between diagnoses of the same pod, in seconds
    #[arg(long)]
    pub cooldown: Option<u64>,

    /// Maximum number of concurrent diagnoses
    #[arg(long)]
    pub max_concurrent: Option<usize>,

    /// Directory to write reports into
    #[arg(long)]
    pub report_dir: Option<String>,
}

#[derive(Args)]
pub struct ReportsArgs {
    /// Directory holding the reports
    #[arg(long)]
    pub report_dir: Option<String>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
