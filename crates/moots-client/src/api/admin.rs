//! `mootslive.v1.AdminService`.

use crate::client::MootsClient;
use crate::error::Result;
use crate::types::{GetStatusRequest, GetStatusResponse};

/// Fully-qualified service name.
pub const SERVICE: &str = "mootslive.v1.AdminService";

/// AdminService client.
pub struct AdminService {
    client: MootsClient,
}

impl AdminService {
    pub(crate) fn new(client: MootsClient) -> Self {
        Self { client }
    }

    /// Liveness check.
    pub async fn get_status(&self) -> Result<GetStatusResponse> {
        self.client
            .unary(SERVICE, "GetStatus", &GetStatusRequest::default())
            .await
    }

    /// Simple connectivity check - returns true if the backend answers.
    pub async fn is_healthy(&self) -> bool {
        self.get_status().await.is_ok()
    }
}
