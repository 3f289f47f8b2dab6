mod check;
mod logs;
mod stats;

pub use check::CheckCommand;
pub use logs::LogsCommand;
pub use stats::StatsCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// GRIDLOG - paginated monitor for the grid telemetry log store.
#[derive(Parser)]
#[command(name = "gridlog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path; falls back to DB_* environment variables
    /// when the file does not exist.
    #[arg(short, long, default_value = "gridlog.toml", global = true)]
    pub config: String,

    /// Verbose logging.
    #[arg(long, global = true)]
    pub verbose: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Test the database connection.
    Check(CheckCommand),

    /// Fetch and print recent logs, page by page.
    Logs(LogsCommand),

    /// Print the per-app log counts for the last 24 hours.
    Stats(StatsCommand),
}

impl Cli {
    /// Execute the selected command.
    pub async fn execute(self) -> Result<()> {
        // Load .env if present
        dotenvy::dotenv().ok();

        let log_level = if self.verbose { "debug" } else { "warn" };
        tracing_subscriber::fmt()
            .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()))
            .init();

        match self.command {
            Commands::Check(cmd) => cmd.execute(&self.config).await,
            Commands::Logs(cmd) => cmd.execute(&self.config).await,
            Commands::Stats(cmd) => cmd.execute(&self.config).await,
        }
    }
}
