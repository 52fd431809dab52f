//! Request and response messages for the `mootslive.v1` services.
//!
//! These types mirror the protobuf contract using the proto3 JSON mapping:
//! lowerCamelCase field names on the wire, default values may be omitted.
//! Decoders also accept the original snake_case field names.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// AdminService
// ─────────────────────────────────────────────────────────────────────────────

/// Request for `AdminService.GetStatus`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetStatusRequest {}

/// Response for `AdminService.GetStatus`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStatusResponse {
    #[serde(default, alias = "x_clacks_overhead")]
    pub x_clacks_overhead: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// UserService
// ─────────────────────────────────────────────────────────────────────────────

/// Request for `UserService.GetMe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetMeRequest {}

/// Response for `UserService.GetMe`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMeResponse {
    /// User ID.
    #[serde(default)]
    pub id: String,
    /// Account creation time.
    #[serde(default, alias = "created_at", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Authorization state issued by `BeginTwitterAuth`.
///
/// Holds the anti-forgery `state` token and the PKCE code verifier. The value
/// must reach `FinishTwitterAuth` exactly as the server issued it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2State {
    /// Anti-forgery token echoed back by the identity provider.
    #[serde(default)]
    pub state: String,
    /// PKCE code verifier.
    #[serde(default, alias = "pkce_code_verifier")]
    pub pkce_code_verifier: String,
}

impl OAuth2State {
    pub fn new(state: impl Into<String>, pkce_code_verifier: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            pkce_code_verifier: pkce_code_verifier.into(),
        }
    }

    /// True when both halves are present.
    pub fn is_complete(&self) -> bool {
        !self.state.is_empty() && !self.pkce_code_verifier.is_empty()
    }

    /// True when neither half is set (the proto3 default value).
    pub fn is_empty(&self) -> bool {
        self.state.is_empty() && self.pkce_code_verifier.is_empty()
    }
}

/// Request for `UserService.BeginTwitterAuth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeginTwitterAuthRequest {}

/// Response for `UserService.BeginTwitterAuth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginTwitterAuthResponse {
    /// Identity provider URL the user must visit.
    #[serde(default, alias = "redirect_url")]
    pub redirect_url: String,
    /// State to hold until the callback arrives.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<OAuth2State>,
}

/// Request for `UserService.FinishTwitterAuth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishTwitterAuthRequest {
    /// State originally issued by `BeginTwitterAuth`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<OAuth2State>,
    /// `state` query parameter from the callback.
    #[serde(default, alias = "received_state")]
    pub received_state: String,
    /// `code` query parameter from the callback.
    #[serde(default, alias = "received_code")]
    pub received_code: String,
}

/// Response for `UserService.FinishTwitterAuth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinishTwitterAuthResponse {
    /// Identity token for the signed-in user.
    #[serde(default, alias = "idToken", alias = "id_token")]
    pub me: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oauth2_state_wire_names() {
        let state = OAuth2State::new("abc", "def");
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "abc", "pkceCodeVerifier": "def"})
        );
    }

    #[test]
    fn test_oauth2_state_accepts_snake_case() {
        let state: OAuth2State =
            serde_json::from_str(r#"{"state":"abc","pkce_code_verifier":"def"}"#).unwrap();
        assert_eq!(state, OAuth2State::new("abc", "def"));
        assert!(state.is_complete());
    }

    #[test]
    fn test_oauth2_state_completeness() {
        assert!(OAuth2State::default().is_empty());
        assert!(!OAuth2State::new("abc", "").is_complete());
        assert!(!OAuth2State::new("abc", "").is_empty());
    }

    #[test]
    fn test_begin_response_without_state() {
        let resp: BeginTwitterAuthResponse =
            serde_json::from_str(r#"{"redirectUrl":"https://idp.example/authorize"}"#).unwrap();
        assert_eq!(resp.redirect_url, "https://idp.example/authorize");
        assert!(resp.state.is_none());
    }

    #[test]
    fn test_finish_request_encoding() {
        let req = FinishTwitterAuthRequest {
            state: Some(OAuth2State::new("abc", "def")),
            received_state: "abc".to_string(),
            received_code: "xyz".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "state": {"state": "abc", "pkceCodeVerifier": "def"},
                "receivedState": "abc",
                "receivedCode": "xyz",
            })
        );
    }

    #[test]
    fn test_finish_response_accepts_id_token() {
        let resp: FinishTwitterAuthResponse =
            serde_json::from_str(r#"{"me":"user-token-123"}"#).unwrap();
        assert_eq!(resp.me, "user-token-123");

        let resp: FinishTwitterAuthResponse =
            serde_json::from_str(r#"{"idToken":"jwt"}"#).unwrap();
        assert_eq!(resp.me, "jwt");
    }

    #[test]
    fn test_get_me_timestamp() {
        let resp: GetMeResponse =
            serde_json::from_str(r#"{"id":"foo","createdAt":"2022-11-05T12:30:00Z"}"#).unwrap();
        assert_eq!(resp.id, "foo");
        assert_eq!(
            resp.created_at.unwrap().to_rfc3339(),
            "2022-11-05T12:30:00+00:00"
        );
    }

    #[test]
    fn test_empty_request_is_empty_object() {
        assert_eq!(
            serde_json::to_string(&BeginTwitterAuthRequest::default()).unwrap(),
            "{}"
        );
    }
}
