//! Error types for the sign-in flow.

use std::sync::Arc;

/// Errors from the pending authorization store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Nothing is stored in the slot.
    #[error("no pending authorization is stored")]
    Missing,

    /// The slot holds something that is not a usable authorization state.
    #[error("stored authorization state is corrupt: {0}")]
    Corrupt(String),

    /// Reading or writing the backing file failed.
    #[error("state store I/O error at '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// True when the slot is unusable for completing a flow, as opposed to
    /// the store itself failing.
    pub fn is_unusable_state(&self) -> bool {
        matches!(self, StoreError::Missing | StoreError::Corrupt(_))
    }
}

/// Outcomes surfaced to the presentation layer when a phase fails.
///
/// Cheap to clone so a single exchange outcome can be handed to every caller
/// that raced on the same callback.
#[derive(Debug, Clone, thiserror::Error)]
pub enum FlowError {
    /// The callback URL lacks `state` or `code`.
    #[error("callback is missing the '{0}' parameter")]
    MissingCallbackParameter(&'static str),

    /// The identity provider redirected back with an error instead of a code.
    #[error("identity provider returned '{error}': {description}")]
    ProviderDenied { error: String, description: String },

    /// No usable pending authorization; the flow has to be restarted.
    #[error("no pending authorization: {0}")]
    NoPendingAuthorization(#[source] Arc<StoreError>),

    /// `BeginTwitterAuth` failed.
    #[error("could not start authorization: {0}")]
    InitiationFailed(#[source] Arc<moots_client::Error>),

    /// `FinishTwitterAuth` failed. The code is spent, so this is final.
    #[error("authorization code exchange failed: {0}")]
    ExchangeFailed(#[source] Arc<moots_client::Error>),

    /// The exchange task stopped before producing an outcome. The pending
    /// state was already consumed, so this is final.
    #[error("authorization code exchange ended without an outcome")]
    ExchangeAborted,

    /// The store could not record a freshly issued state.
    #[error("could not persist authorization state: {0}")]
    Store(#[source] Arc<StoreError>),
}

impl FlowError {
    /// True when simply invoking the first phase again may succeed. Every
    /// other failure needs a fresh trip through the identity provider.
    pub fn is_retryable(&self) -> bool {
        matches!(self, FlowError::InitiationFailed(_) | FlowError::Store(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result type for flow operations.
pub type Result<T> = std::result::Result<T, FlowError>;
