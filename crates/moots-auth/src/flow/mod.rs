//! The two phases of the sign-in flow.
//!
//! ```text
//!  BeginFlow:   Idle -> Initiating -> AwaitingRedirectReturn
//!                                  \-> Failed
//!                       (user leaves for the identity provider)
//!  FinishFlow:  Idle -> Exchanging -> Succeeded
//!                    \             \-> Failed
//!                     \-> Failed
//! ```
//!
//! The machines share nothing but the [`StateStore`](crate::StateStore) slot.

mod begin;
mod finish;

pub use begin::{BeginFlow, BeginState, Initiation};
pub use finish::{AuthenticatedIdentity, FinishFlow, FinishState};

use crate::service::SharedAuthService;
use crate::store::SharedStateStore;

/// Hands out phase controllers wired to one service and one store.
#[derive(Clone)]
pub struct AuthFlow {
    service: SharedAuthService,
    store: SharedStateStore,
}

impl AuthFlow {
    pub fn new(service: SharedAuthService, store: SharedStateStore) -> Self {
        Self { service, store }
    }

    /// Controller for the first phase.
    pub fn begin(&self) -> BeginFlow {
        BeginFlow::new(self.service.clone(), self.store.clone())
    }

    /// Fresh controller for one callback.
    pub fn finish(&self) -> FinishFlow {
        FinishFlow::new(self.service.clone(), self.store.clone())
    }

    /// The store both phases use.
    pub fn store(&self) -> &SharedStateStore {
        &self.store
    }
}
