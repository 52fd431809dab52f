//! Me command - looks up the signed-in user.

use anyhow::{Context as _, Result};
use clap::Args;
use console::Style;
use serde::Serialize;

use super::Context;

/// Arguments for the me command.
#[derive(Args, Debug)]
pub struct MeArgs {
    /// Identity token from `moots auth finish`
    #[arg(long, env = "MOOTS_ID_TOKEN")]
    pub token: Option<String>,
}

#[derive(Debug, Serialize)]
struct MeOutput {
    id: String,
    created_at: Option<String>,
}

/// Run the me command.
pub async fn run(args: MeArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client(args.token.as_deref())?;
    let me = client
        .users()
        .get_me()
        .await
        .context("GetMe failed")?;

    let output = MeOutput {
        id: me.id,
        created_at: me.created_at.map(|t| t.to_rfc3339()),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let dim = Style::new().dim();
        println!("  {} {}", dim.apply_to("ID:"), output.id);
        if let Some(created_at) = &output.created_at {
            println!("  {} {}", dim.apply_to("Created:"), created_at);
        }
    }

    Ok(())
}
