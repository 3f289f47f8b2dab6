use anyhow::Result;
use clap::Parser;
use console::style;

use crate::runtime::{build_monitor, load_config};

/// Print the per-app log counts for the last 24 hours.
#[derive(Parser)]
pub struct StatsCommand {}

impl StatsCommand {
    pub async fn execute(self, config_path: &str) -> Result<()> {
        let config = load_config(config_path)?;
        let mut monitor = build_monitor(&config).await?;
        monitor.refresh().await?;

        if let Some(failure) = monitor.last_failure() {
            println!(
                "  {} fetch failed ({:?}): {}",
                style("✗").red().bold(),
                failure.kind,
                failure.message
            );
        }

        if monitor.stats().is_empty() {
            println!("  {}", style("no stats available").dim());
            return Ok(());
        }

        println!("  {} log stats (last 24 hours)", style("⚡").bold());
        println!(
            "  {}",
            style(format!("total logs: {}", monitor.stats_total())).dim()
        );
        println!();
        for stat in monitor.stats() {
            println!("  {}: {} logs", style(&stat.app).cyan(), stat.count);
        }
        Ok(())
    }
}
