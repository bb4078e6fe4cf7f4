use crate::commands::Commands;

use clap::Parser;

#[derive(Parser)]
#[command(name = "pay")]
#[command(about = "paytrack command-line client")]
#[command(version)]
#[command(propagate_version = true)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Commands,

    /// Backend URL (overrides config.toml and PT_API_BASE_URL)
    #[arg(long, global = true)]
    pub(crate) server: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub(crate) pretty: bool,

    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, global = true)]
    pub(crate) log_level: Option<String>,
}
