//! Wire-level tests for the Connect unary binding.

use moots_client::{Code, Error, FinishTwitterAuthRequest, MootsClient, OAuth2State};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> MootsClient {
    MootsClient::builder()
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_get_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mootslive.v1.AdminService/GetStatus"))
        .and(header("content-type", "application/json"))
        .and(header("connect-protocol-version", "1"))
        .and(body_json(json!({})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"xClacksOverhead": "GNU Terry Pratchett"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client.admin().get_status().await.unwrap();
    assert_eq!(status.x_clacks_overhead, "GNU Terry Pratchett");
}

#[tokio::test]
async fn test_begin_twitter_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mootslive.v1.UserService/BeginTwitterAuth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "redirectUrl": "https://idp.example/authorize?state=abc",
            "state": {"state": "abc", "pkceCodeVerifier": "def"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = client.users().begin_twitter_auth().await.unwrap();
    assert_eq!(resp.redirect_url, "https://idp.example/authorize?state=abc");
    assert_eq!(resp.state, Some(OAuth2State::new("abc", "def")));
}

#[tokio::test]
async fn test_finish_twitter_auth_sends_state_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mootslive.v1.UserService/FinishTwitterAuth"))
        .and(body_json(json!({
            "state": {"state": "abc", "pkceCodeVerifier": "def"},
            "receivedState": "abc",
            "receivedCode": "xyz"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"me": "user-token-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let resp = client
        .users()
        .finish_twitter_auth(&FinishTwitterAuthRequest {
            state: Some(OAuth2State::new("abc", "def")),
            received_state: "abc".to_string(),
            received_code: "xyz".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(resp.me, "user-token-123");
}

#[tokio::test]
async fn test_connect_error_is_decoded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mootslive.v1.UserService/FinishTwitterAuth"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": "invalid_argument",
            "message": "state received from twitter did not match initial state"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .users()
        .finish_twitter_auth(&FinishTwitterAuthRequest::default())
        .await
        .unwrap_err();

    match err {
        Error::Rpc {
            code,
            message,
            status,
        } => {
            assert_eq!(code, Code::InvalidArgument);
            assert!(message.contains("did not match"));
            assert_eq!(status, 400);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_non_connect_error_falls_back_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.users().get_me().await.unwrap_err();
    assert_eq!(err.code(), Some(Code::Unavailable));
    assert!(err.is_server_error());
    assert!(!client.admin().is_healthy().await);
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/mootslive.v1.UserService/GetMe"))
        .and(header("authorization", "Bearer user-token-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "foo",
            "createdAt": "2022-11-05T12:30:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = MootsClient::builder()
        .base_url(server.uri())
        .auth_token("user-token-123")
        .build()
        .unwrap();
    let me = client.users().get_me().await.unwrap();
    assert_eq!(me.id, "foo");
    assert!(me.created_at.is_some());
}
