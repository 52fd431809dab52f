//! CLI command handlers.

pub mod auth;
pub mod me;
pub mod status;

use std::sync::Arc;

use anyhow::{Context as _, Result};
use moots_auth::{AuthFlow, FileStateStore, create_state_store};
use moots_client::MootsClient;
use moots_config::LoadedConfig;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Effective configuration.
    pub config: LoadedConfig,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    /// Backend URL in use.
    pub fn server_url(&self) -> &str {
        &self.config.config.server
    }

    /// Build an RPC client, optionally carrying an identity token.
    pub fn client(&self, identity_token: Option<&str>) -> Result<MootsClient> {
        let mut builder = MootsClient::builder()
            .base_url(self.server_url())
            .timeout(self.config.config.timeout());
        if let Some(token) = identity_token {
            builder = builder.auth_token(token);
        }
        builder
            .build()
            .with_context(|| format!("invalid backend URL '{}'", self.server_url()))
    }

    /// The slot holding a pending authorization between the two phases.
    pub fn state_store(&self) -> FileStateStore {
        FileStateStore::new(&self.config.state_dir())
    }

    /// Wire the sign-in flow to the backend and the state slot.
    pub fn auth_flow(&self) -> Result<AuthFlow> {
        Ok(AuthFlow::new(
            Arc::new(self.client(None)?),
            create_state_store(&self.config.state_dir()),
        ))
    }
}
