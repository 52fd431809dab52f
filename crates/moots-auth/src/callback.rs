//! Parameters the identity provider sends back to the callback URL.

use url::Url;

use crate::error::FlowError;

/// Error reported by the identity provider in place of a code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    pub error: String,
    pub description: String,
}

/// The `state` and `code` query parameters of one callback.
///
/// Construction never fails; [`CallbackParameters::validate`] decides whether
/// the callback can be exchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackParameters {
    /// Anti-forgery token echoed by the provider.
    pub received_state: String,
    /// Single-use authorization code.
    pub received_code: String,
    /// Set when the provider redirected back with `error=...`.
    pub provider_error: Option<ProviderError>,
}

impl CallbackParameters {
    pub fn new(received_state: impl Into<String>, received_code: impl Into<String>) -> Self {
        Self {
            received_state: received_state.into(),
            received_code: received_code.into(),
            provider_error: None,
        }
    }

    /// Parse a query string (with or without the leading `?`).
    ///
    /// The first occurrence of a repeated key wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);

        let mut state = None;
        let mut code = None;
        let mut error = None;
        let mut description = None;

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "state" => &mut state,
                "code" => &mut code,
                "error" => &mut error,
                "error_description" => &mut description,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        Self {
            received_state: state.unwrap_or_default(),
            received_code: code.unwrap_or_default(),
            provider_error: error.filter(|e| !e.is_empty()).map(|error| ProviderError {
                error,
                description: description.unwrap_or_default(),
            }),
        }
    }

    /// Parse the query string of a full callback URL.
    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Check that the callback carries everything an exchange needs.
    pub fn validate(&self) -> Result<(), FlowError> {
        if let Some(err) = &self.provider_error {
            return Err(FlowError::ProviderDenied {
                error: err.error.clone(),
                description: err.description.clone(),
            });
        }
        if self.received_state.is_empty() {
            return Err(FlowError::MissingCallbackParameter("state"));
        }
        if self.received_code.is_empty() {
            return Err(FlowError::MissingCallbackParameter("code"));
        }
        Ok(())
    }
}
