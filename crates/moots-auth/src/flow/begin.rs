//! First phase: obtain a redirect URL and stash the issued state.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{FlowError, Result};
use crate::service::SharedAuthService;
use crate::store::SharedStateStore;

/// Where the first phase currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginState {
    Idle,
    Initiating,
    /// The redirect URL has been handed out; the rest happens after the user
    /// comes back from the identity provider.
    AwaitingRedirectReturn,
    Failed,
}

/// A started flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Initiation {
    /// Identity provider URL the user should open.
    pub redirect_url: String,
    /// False when the backend issued no usable state. The callback will then
    /// fail with [`FlowError::NoPendingAuthorization`].
    pub state_persisted: bool,
}

/// Controller for the first phase.
pub struct BeginFlow {
    service: SharedAuthService,
    store: SharedStateStore,
    state: Mutex<BeginState>,
}

impl BeginFlow {
    pub fn new(service: SharedAuthService, store: SharedStateStore) -> Self {
        Self {
            service,
            store,
            state: Mutex::new(BeginState::Idle),
        }
    }

    pub fn state(&self) -> BeginState {
        *self.state.lock()
    }

    fn transition(&self, next: BeginState) {
        let mut state = self.state.lock();
        tracing::debug!(from = ?*state, to = ?next, "begin flow transition");
        *state = next;
    }

    /// Call `BeginTwitterAuth` and persist the returned state.
    ///
    /// May be called again after a failure, or to supersede a flow the user
    /// abandoned; the new state replaces the old one in the store.
    pub async fn begin_authorization(&self) -> Result<Initiation> {
        self.transition(BeginState::Initiating);

        let response = match self.service.begin_twitter_auth().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "BeginTwitterAuth failed");
                self.transition(BeginState::Failed);
                return Err(FlowError::InitiationFailed(Arc::new(e)));
            }
        };

        let state_persisted = match response.state.as_ref().filter(|s| s.is_complete()) {
            Some(state) => {
                if let Err(e) = self.store.save(state).await {
                    tracing::error!(error = %e, "could not persist authorization state");
                    self.transition(BeginState::Failed);
                    return Err(FlowError::Store(Arc::new(e)));
                }
                true
            }
            None => {
                tracing::warn!("BeginTwitterAuth returned no usable state; callback will fail");
                false
            }
        };

        tracing::info!(state_persisted, "authorization started");
        self.transition(BeginState::AwaitingRedirectReturn);

        Ok(Initiation {
            redirect_url: response.redirect_url,
            state_persisted,
        })
    }
}
