//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::api::{AdminService, UserService};
use crate::error::{Code, Error, ErrorResponse, Result};

/// Default timeout for unary calls.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect protocol version header.
const CONNECT_PROTOCOL_VERSION: HeaderName = HeaderName::from_static("connect-protocol-version");

/// Connect timeout header, in milliseconds.
const CONNECT_TIMEOUT_MS: &str = "connect-timeout-ms";

/// Connect RPC client for the mootslive backend.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use moots_client::MootsClient;
///
/// # async fn example() -> moots_client::Result<()> {
/// let client = MootsClient::builder()
///     .base_url("http://localhost:9000")
///     .build()?;
///
/// let me = client.users().get_me().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct MootsClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for RPC requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
}

impl std::fmt::Debug for MootsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MootsClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

impl MootsClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Create a client pointing at the local development backend.
    pub fn localhost() -> Result<Self> {
        Self::builder().base_url("http://localhost:9000").build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Service accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access `mootslive.v1.UserService`.
    pub fn users(&self) -> UserService {
        UserService::new(self.clone())
    }

    /// Access `mootslive.v1.AdminService`.
    pub fn admin(&self) -> AdminService {
        AdminService::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal RPC methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build the URL for a procedure: `{base}/{service}/{method}`.
    pub(crate) fn url(&self, service: &str, method: &str) -> Result<Url> {
        self.inner
            .base_url
            .join(&format!("{}/{}", service, method))
            .map_err(Error::from)
    }

    /// Make a Connect unary call.
    pub(crate) async fn unary<Req, Resp>(
        &self,
        service: &str,
        method: &str,
        request: &Req,
    ) -> Result<Resp>
    where
        Req: serde::Serialize + ?Sized,
        Resp: serde::de::DeserializeOwned,
    {
        let url = self.url(service, method)?;
        tracing::debug!(%url, "dispatching unary call");

        let response = self
            .inner
            .http
            .post(url)
            .header(CONNECT_TIMEOUT_MS, self.inner.timeout.as_millis().to_string())
            .json(request)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        match response.json::<ErrorResponse>().await {
            Ok(err) if !err.code.is_empty() => Error::Rpc {
                code: err
                    .code
                    .parse()
                    .unwrap_or_else(|_| Code::from_http_status(status)),
                message: err.message,
                status,
            },
            _ => Error::Rpc {
                code: Code::from_http_status(status),
                message: format!("HTTP {}", status),
                status,
            },
        }
    }
}

/// Builder for creating a [`MootsClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    auth_token: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            auth_token: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL for the backend.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the identity token sent as a bearer credential.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<MootsClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(CONNECT_PROTOCOL_VERSION, HeaderValue::from_static("1"));

        if let Some(token) = &self.auth_token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| Error::Config("Invalid auth token".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("moots-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(MootsClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
