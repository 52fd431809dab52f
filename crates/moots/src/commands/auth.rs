//! Auth command - sign in with Twitter.
//!
//! `begin` and `finish` are the two halves of the flow. They run as separate
//! invocations: the user visits the identity provider in between.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use console::{Style, style};
use moots_auth::{CallbackParameters, StateStore, StoreError};
use serde::Serialize;
use url::Url;

use super::Context;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Start signing in and print the Twitter authorization link
    Begin {
        /// Also try to open the link in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Finish signing in with the URL Twitter redirected back to
    Finish {
        /// Full callback URL, or just its query string
        #[arg(required_unless_present_all = ["state", "code"])]
        callback_url: Option<String>,

        /// `state` query parameter (instead of a callback URL)
        #[arg(long, conflicts_with = "callback_url", requires = "code")]
        state: Option<String>,

        /// `code` query parameter (instead of a callback URL)
        #[arg(long, conflicts_with = "callback_url", requires = "state")]
        code: Option<String>,
    },

    /// Show whether a sign-in is pending
    Status,

    /// Discard a pending sign-in
    Reset,
}

/// Run the auth command.
pub async fn run(args: AuthArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AuthCommand::Begin { open } => cmd_begin(open, ctx).await,
        AuthCommand::Finish {
            callback_url,
            state,
            code,
        } => {
            let params = match callback_url {
                Some(input) => parse_callback(&input),
                None => {
                    CallbackParameters::new(state.unwrap_or_default(), code.unwrap_or_default())
                }
            };
            cmd_finish(params, ctx).await
        }
        AuthCommand::Status => cmd_status(ctx).await,
        AuthCommand::Reset => cmd_reset(ctx).await,
    }
}

/// Accept either a full URL or a bare query string.
fn parse_callback(input: &str) -> CallbackParameters {
    let input = input.trim();
    match Url::parse(input) {
        Ok(url) => CallbackParameters::from_url(&url),
        Err(_) => CallbackParameters::from_query(input),
    }
}

#[derive(Debug, Serialize)]
struct BeginOutput {
    redirect_url: String,
    state_persisted: bool,
}

async fn cmd_begin(open: bool, ctx: &Context) -> Result<()> {
    let flow = ctx.auth_flow()?.begin();
    let initiation = flow.begin_authorization().await?;

    if ctx.json_output {
        let output = BeginOutput {
            redirect_url: initiation.redirect_url.clone(),
            state_persisted: initiation.state_persisted,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        let dim = Style::new().dim();

        println!();
        println!("{}", style("Sign in with Twitter").bold());
        println!("{}", dim.apply_to("─".repeat(40)));
        println!();
        println!("Open this URL in your browser:");
        println!();
        println!("  {}", initiation.redirect_url);
        println!();
        println!("After approving, run:");
        println!("  moots auth finish '<the URL you were sent back to>'");
        println!();

        if !initiation.state_persisted {
            println!(
                "{}",
                Style::new()
                    .yellow()
                    .apply_to("Warning: the backend issued no state; finishing will fail.")
            );
            println!();
        }
    }

    if open && open_url(&initiation.redirect_url).is_err() && !ctx.json_output {
        println!("(Could not open browser automatically)");
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct FinishOutput {
    identity_token: String,
}

async fn cmd_finish(params: CallbackParameters, ctx: &Context) -> Result<()> {
    let flow = ctx.auth_flow()?.finish();

    let identity = match flow.complete_authorization(&params).await {
        Ok(identity) => identity,
        Err(e) if e.is_retryable() => bail!("{e}"),
        Err(e) => bail!("{e}\nRun 'moots auth begin' to start over."),
    };

    if ctx.json_output {
        let output = FinishOutput {
            identity_token: identity.into_token(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!();
        println!("{}", Style::new().green().apply_to("Signed in."));
        println!();
        println!("Identity token:");
        println!("  {}", identity.token());
        println!();
        println!("Use it with: moots me --token <token>");
        println!();
    }

    Ok(())
}

#[derive(Debug, Serialize)]
struct StatusOutput {
    pending: bool,
    usable: bool,
    path: String,
}

async fn cmd_status(ctx: &Context) -> Result<()> {
    let store = ctx.state_store();
    let loaded = store.load().await;

    let output = StatusOutput {
        pending: store.has_pending(),
        usable: loaded.is_ok(),
        path: store.path().display().to_string(),
    };

    if ctx.json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let dim = Style::new().dim();
    match loaded {
        Ok(_) => println!("Sign-in pending: waiting for the Twitter callback"),
        Err(StoreError::Missing) => println!("No sign-in pending"),
        Err(e) => {
            println!("Sign-in state is unusable: {}", e);
            println!("  Run 'moots auth reset' and start over.");
        }
    }
    if ctx.verbose {
        println!("  {} {}", dim.apply_to("Path:"), output.path);
    }

    Ok(())
}

async fn cmd_reset(ctx: &Context) -> Result<()> {
    let store = ctx.state_store();
    let had_pending = store.has_pending();
    store.clear().await?;

    if ctx.json_output {
        println!("{}", serde_json::json!({ "cleared": had_pending }));
    } else if had_pending {
        println!("Pending sign-in discarded.");
    } else {
        println!("No sign-in pending.");
    }

    Ok(())
}

/// Try to open a URL in the default browser.
fn open_url(url: &str) -> std::io::Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).status()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).status()?;
    }
    #[cfg(target_os = "windows")]
    {
        use std::os::windows::process::CommandExt;

        std::process::Command::new("cmd")
            .raw_arg(start_command_line(url))
            .status()?;
    }
    Ok(())
}

/// `start` takes its first quoted argument as the window title, and cmd
/// splits an unquoted URL at `&`.
#[cfg(any(windows, test))]
fn start_command_line(url: &str) -> String {
    format!("/C start \"\" \"{url}\"")
}
