use anyhow::Result;
use clap::Parser;
use console::style;

use gridlog_core::LogRecord;

use crate::runtime::{build_monitor, load_config};

/// Fetch and print recent logs, page by page.
#[derive(Parser)]
pub struct LogsCommand {
    /// Number of pages to fetch (one refresh plus pages-1 load-mores).
    #[arg(short, long, default_value = "1")]
    pub pages: u32,

    /// Logs per page (overrides config).
    #[arg(long)]
    pub page_size: Option<i64>,
}

impl LogsCommand {
    pub async fn execute(self, config_path: &str) -> Result<()> {
        let mut config = load_config(config_path)?;
        if let Some(page_size) = self.page_size {
            config.monitor.page_size = page_size;
        }

        let mut monitor = build_monitor(&config).await?;
        monitor.refresh().await?;

        for _ in 1..self.pages {
            let before = monitor.logs().len();
            monitor.load_more().await?;
            if monitor.logs().len() == before {
                // Exhausted; further attempts would be identical.
                break;
            }
        }

        if let Some(failure) = monitor.last_failure() {
            println!(
                "  {} fetch failed ({:?}): {}",
                style("✗").red().bold(),
                failure.kind,
                failure.message
            );
        }

        if monitor.logs().is_empty() {
            println!("  {}", style("no logs found").dim());
            return Ok(());
        }

        println!(
            "  {} recent logs ({} displayed)",
            style("⚡").bold(),
            monitor.logs().len()
        );
        println!();
        for record in monitor.logs() {
            print_record(record);
        }
        Ok(())
    }
}

fn print_record(record: &LogRecord) {
    println!(
        "  {} - {}",
        style(format!("Log #{}", record.id)).cyan().bold(),
        record.app
    );
    println!("    Date: {}", record.timestamp);
    if let Some(client_id) = &record.client_id {
        println!("    Client ID: {}", client_id);
    }
    if let Some(substation) = &record.substation {
        println!("    Substation: {}", substation);
    }
    if let Some(feeder) = &record.feeder {
        println!("    Feeder: {}", feeder);
    }
    match &record.metadata {
        Some(metadata) => println!("    Metadata: {}", metadata),
        None => println!("    {}", style("Metadata: (none)").dim()),
    }
    println!();
}
