//! The backend calls the flows depend on.

use std::sync::Arc;

use async_trait::async_trait;
use moots_client::{
    BeginTwitterAuthResponse, FinishTwitterAuthRequest, FinishTwitterAuthResponse, MootsClient,
};

/// The two `UserService` procedures used by the sign-in flow.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// `UserService.BeginTwitterAuth`.
    async fn begin_twitter_auth(&self) -> moots_client::Result<BeginTwitterAuthResponse>;

    /// `UserService.FinishTwitterAuth`.
    async fn finish_twitter_auth(
        &self,
        request: &FinishTwitterAuthRequest,
    ) -> moots_client::Result<FinishTwitterAuthResponse>;
}

#[async_trait]
impl AuthService for MootsClient {
    async fn begin_twitter_auth(&self) -> moots_client::Result<BeginTwitterAuthResponse> {
        self.users().begin_twitter_auth().await
    }

    async fn finish_twitter_auth(
        &self,
        request: &FinishTwitterAuthRequest,
    ) -> moots_client::Result<FinishTwitterAuthResponse> {
        self.users().finish_twitter_auth(request).await
    }
}

/// Shared service handle.
pub type SharedAuthService = Arc<dyn AuthService>;
