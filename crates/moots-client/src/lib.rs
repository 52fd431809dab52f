//! Connect RPC client for the `mootslive.v1` services.
//!
//! This crate provides typed unary calls against the mootslive backend.
//!
//! # Example
//!
//! ```no_run
//! use moots_client::{MootsClient, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = MootsClient::builder()
//!     .base_url("http://localhost:9000")
//!     .build()?;
//!
//! // Liveness
//! let status = client.admin().get_status().await?;
//! println!("X-Clacks-Overhead: {}", status.x_clacks_overhead);
//!
//! // Start a Twitter sign-in
//! let begin = client.users().begin_twitter_auth().await?;
//! println!("Visit {}", begin.redirect_url);
//! # Ok(())
//! # }
//! ```
//!
//! # API Coverage
//!
//! - **AdminService**: `GetStatus`
//! - **UserService**: `GetMe`, `BeginTwitterAuth`, `FinishTwitterAuth`

pub mod api;
pub mod client;
pub mod error;
pub mod types;

pub use api::{AdminService, UserService};
pub use client::{ClientBuilder, MootsClient};
pub use error::{Code, Error, Result};
pub use types::*;
