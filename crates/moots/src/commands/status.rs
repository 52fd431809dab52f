//! Status command - checks that the backend answers.

use anyhow::Result;
use clap::Args;
use console::{Style, style};
use serde::Serialize;

use super::Context;

/// Arguments for the status command.
#[derive(Args, Debug)]
pub struct StatusArgs {}

/// Status response for JSON output.
#[derive(Debug, Serialize)]
struct StatusOutput {
    running: bool,
    x_clacks_overhead: Option<String>,
    server_url: String,
}

/// Run the status command.
pub async fn run(_args: StatusArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client(None)?;
    let result = client.admin().get_status().await;

    if ctx.json_output {
        let output = StatusOutput {
            running: result.is_ok(),
            x_clacks_overhead: result.as_ref().ok().map(|s| s.x_clacks_overhead.clone()),
            server_url: ctx.server_url().to_string(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    println!();
    println!("{}", style("mootslive Backend Status").bold());
    println!("{}", dim.apply_to("─".repeat(40)));
    println!();

    match result {
        Ok(status) => {
            println!(
                "  {} {}",
                dim.apply_to("Status:"),
                Style::new().green().apply_to("● running")
            );
            if !status.x_clacks_overhead.is_empty() {
                println!(
                    "  {} {}",
                    dim.apply_to("X-Clacks-Overhead:"),
                    status.x_clacks_overhead
                );
            }
            println!("  {} {}", dim.apply_to("Server:"), ctx.server_url());
        }
        Err(e) => {
            println!(
                "  {} {}",
                dim.apply_to("Status:"),
                Style::new().red().apply_to("● unreachable")
            );
            println!("  {} {}", dim.apply_to("Server:"), ctx.server_url());
            if ctx.verbose {
                println!();
                println!("  {} {}", dim.apply_to("Error:"), e);
            }
        }
    }
    println!();

    Ok(())
}
