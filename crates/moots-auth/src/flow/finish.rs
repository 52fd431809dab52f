//! Second phase: exchange the callback's code, at most once.

use std::fmt;
use std::sync::Arc;

use moots_client::FinishTwitterAuthRequest;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::callback::CallbackParameters;
use crate::error::{FlowError, Result};
use crate::service::SharedAuthService;
use crate::store::SharedStateStore;

/// Where the second phase currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishState {
    Idle,
    Exchanging,
    Succeeded,
    Failed,
}

impl FinishState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FinishState::Succeeded | FinishState::Failed)
    }
}

/// Identity token returned by a successful exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    token: String,
}

impl AuthenticatedIdentity {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn into_token(self) -> String {
        self.token
    }
}

impl fmt::Debug for AuthenticatedIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticatedIdentity")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// `None` while the exchange is in flight.
type Outcome = Option<Result<AuthenticatedIdentity>>;

/// Controller for one callback.
///
/// Create a fresh instance per callback. The first call to
/// [`complete_authorization`](Self::complete_authorization) starts the
/// exchange on its own task; every other call on the same instance,
/// concurrent or later, waits for and returns that same outcome without
/// touching the network. Dropping a caller does not cancel the exchange.
pub struct FinishFlow {
    exchanger: Arc<Exchanger>,
    // None: not started. Some, holding None: in flight. Some, holding Some: done.
    latch: Mutex<Option<watch::Receiver<Outcome>>>,
}

impl FinishFlow {
    pub fn new(service: SharedAuthService, store: SharedStateStore) -> Self {
        Self {
            exchanger: Arc::new(Exchanger {
                service,
                store,
                state: Mutex::new(FinishState::Idle),
            }),
            latch: Mutex::new(None),
        }
    }

    pub fn state(&self) -> FinishState {
        *self.exchanger.state.lock()
    }

    /// Exchange the callback for an identity.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn complete_authorization(
        &self,
        params: &CallbackParameters,
    ) -> Result<AuthenticatedIdentity> {
        let mut outcome = self.dispatch(params);
        let recorded = match outcome.wait_for(Option::is_some).await {
            Ok(recorded) => (*recorded).clone(),
            Err(_) => None,
        };
        recorded.unwrap_or(Err(FlowError::ExchangeAborted))
    }

    /// Start the exchange unless the latch is already set, and hand back a
    /// receiver for its outcome.
    fn dispatch(&self, params: &CallbackParameters) -> watch::Receiver<Outcome> {
        let mut latch = self.latch.lock();
        if let Some(outcome) = latch.as_ref() {
            tracing::debug!("callback already dispatched; waiting for its outcome");
            return outcome.clone();
        }

        let (tx, rx) = watch::channel(None);
        *latch = Some(rx.clone());

        let exchanger = self.exchanger.clone();
        let params = params.clone();
        tokio::spawn(async move {
            let outcome = exchanger.run(&params).await;
            tx.send_replace(Some(outcome));
        });

        rx
    }
}

/// The part of a [`FinishFlow`] the exchange task owns.
struct Exchanger {
    service: SharedAuthService,
    store: SharedStateStore,
    state: Mutex<FinishState>,
}

impl Exchanger {
    fn transition(&self, next: FinishState) {
        let mut state = self.state.lock();
        tracing::debug!(from = ?*state, to = ?next, "finish flow transition");
        *state = next;
    }

    async fn run(&self, params: &CallbackParameters) -> Result<AuthenticatedIdentity> {
        if let Err(e) = params.validate() {
            tracing::warn!(error = %e, "rejecting callback");
            self.transition(FinishState::Failed);
            return Err(e);
        }

        // Consumed before dispatch: the code is single use, so nothing may
        // read this state again once the exchange is under way.
        let pending = match self.store.take().await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::warn!(error = %e, "no usable pending authorization");
                self.transition(FinishState::Failed);
                return Err(FlowError::NoPendingAuthorization(Arc::new(e)));
            }
        };

        self.transition(FinishState::Exchanging);

        // Passed through untouched; the backend decides whether the echoed
        // state matches.
        let request = FinishTwitterAuthRequest {
            state: Some(pending),
            received_state: params.received_state.clone(),
            received_code: params.received_code.clone(),
        };

        match self.service.finish_twitter_auth(&request).await {
            Ok(response) => {
                tracing::info!("authorization completed");
                self.transition(FinishState::Succeeded);
                Ok(AuthenticatedIdentity::new(response.me))
            }
            Err(e) => {
                tracing::warn!(error = %e, "FinishTwitterAuth failed");
                self.transition(FinishState::Failed);
                Err(FlowError::ExchangeFailed(Arc::new(e)))
            }
        }
    }
}
