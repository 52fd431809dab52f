//! Configuration for the moots client.
//!
//! A single TOML file, `config.toml`, in the moots config directory:
//!
//! ```toml
//! server = "http://localhost:9000"
//! timeout_secs = 30
//! # state_dir = "/somewhere/else"
//! ```
//!
//! Resolution order (later overrides earlier):
//! 1. Built-in defaults
//! 2. `config.toml` (from `MOOTS_CONFIG_DIR` or the platform config dir)
//! 3. `MOOTS_SERVER_URL`
//! 4. CLI arguments (handled externally)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    LoadedConfig, config_dir, config_path, load_config, load_config_with_options, save_config,
};
pub use error::{ConfigError, Result};
pub use types::ClientConfig;
