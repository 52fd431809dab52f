//! Client side of the "sign in with Twitter" flow.
//!
//! The flow has two phases separated by a full trip to the identity
//! provider, so no in-memory object lives across both:
//!
//! - [`flow::BeginFlow`] asks the backend for a redirect URL and stashes the
//!   returned [`OAuth2State`](moots_client::OAuth2State) in a [`StateStore`].
//! - [`flow::FinishFlow`] runs when the provider sends the user back. It
//!   reads the pending state, exchanges the callback's code exactly once and
//!   clears the slot.
//!
//! # Components
//!
//! - [`store`]: single-slot persistence for the pending authorization
//! - [`callback`]: parsing of the provider's callback query string
//! - [`service`]: the RPC seam the flows call through
//! - [`flow`]: the two phase controllers

pub mod callback;
pub mod error;
pub mod flow;
pub mod service;
pub mod store;

pub use callback::{CallbackParameters, ProviderError};
pub use error::{FlowError, StoreError};
pub use flow::{
    AuthFlow, AuthenticatedIdentity, BeginFlow, BeginState, FinishFlow, FinishState, Initiation,
};
pub use service::{AuthService, SharedAuthService};
pub use store::{
    FileStateStore, InMemoryStateStore, SharedStateStore, StateStore, create_state_store,
};
