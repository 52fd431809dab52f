//! `mootslive.v1.UserService`.

use crate::client::MootsClient;
use crate::error::Result;
use crate::types::{
    BeginTwitterAuthRequest, BeginTwitterAuthResponse, FinishTwitterAuthRequest,
    FinishTwitterAuthResponse, GetMeRequest, GetMeResponse,
};

/// Fully-qualified service name.
pub const SERVICE: &str = "mootslive.v1.UserService";

/// UserService client.
pub struct UserService {
    client: MootsClient,
}

impl UserService {
    pub(crate) fn new(client: MootsClient) -> Self {
        Self { client }
    }

    /// Look up the signed-in user.
    pub async fn get_me(&self) -> Result<GetMeResponse> {
        self.client
            .unary(SERVICE, "GetMe", &GetMeRequest::default())
            .await
    }

    /// Start a Twitter sign-in. Returns the provider URL and the state to hold
    /// until the callback arrives.
    pub async fn begin_twitter_auth(&self) -> Result<BeginTwitterAuthResponse> {
        self.client
            .unary(SERVICE, "BeginTwitterAuth", &BeginTwitterAuthRequest::default())
            .await
    }

    /// Exchange the callback's code for an identity token.
    ///
    /// The authorization code is single-use upstream; callers must not retry.
    pub async fn finish_twitter_auth(
        &self,
        request: &FinishTwitterAuthRequest,
    ) -> Result<FinishTwitterAuthResponse> {
        self.client
            .unary(SERVICE, "FinishTwitterAuth", request)
            .await
    }
}
