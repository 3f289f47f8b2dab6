use anyhow::Result;
use clap::Parser;
use console::style;

use crate::runtime::{build_monitor, load_config};

/// Test the database connection and report a status string.
///
/// Never exits with a crash on connection trouble: every failure is a
/// printed status, mirroring how the monitor surfaces it to a host.
#[derive(Parser)]
pub struct CheckCommand {}

impl CheckCommand {
    pub async fn execute(self, config_path: &str) -> Result<()> {
        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(err) => {
                println!("  {} {}", style("✗").red().bold(), err);
                return Ok(());
            }
        };

        println!(
            "  {} Testing connection to {}:{}/{}",
            style("⚡").bold(),
            config.database.host,
            config.database.port,
            config.database.database
        );

        let mut monitor = match build_monitor(&config).await {
            Ok(monitor) => monitor,
            Err(err) => {
                println!("  {} connection failed: {}", style("✗").red().bold(), err);
                return Ok(());
            }
        };

        monitor.test_connection().await;
        let status = monitor.connection_status();
        if status == "connected" {
            println!("  {} {}", style("✓").green().bold(), status);
        } else {
            println!("  {} {}", style("✗").red().bold(), status);
        }
        Ok(())
    }
}
