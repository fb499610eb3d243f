//! Client integration tests against a mock platform API.

use colleago_client::{ClientConfig, ClientError, ColleagoClient, Method, UNEXPECTED_REPLY_CODE};
use colleago_core::{format_issued_at, Clock, RequestSigner, SignedRequestError, SystemClock};
use serde_json::json;
use wiremock::matchers::{body_json, body_string, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> ColleagoClient {
    let mut config = ClientConfig::new("my-app", "my-secret");
    config.scheme = "http".to_owned();
    config.hostname = server
        .uri()
        .trim_start_matches("http://")
        .to_owned();
    ColleagoClient::new(config).unwrap()
}

// ============================================================================
// Typed wrappers
// ============================================================================

#[tokio::test]
async fn get_attaches_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/networks/08e1e1eadc000e6c/user/08e1e1eead0dc968/"))
        .and(header("authorization", "Bearer my-app_my-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "EID": "08e1e1eead0dc968",
            "name": "Jane Doe"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .get("/networks/08e1e1eadc000e6c/user/08e1e1eead0dc968/")
        .await
        .unwrap();
    assert_eq!(result["name"], "Jane Doe");
}

#[tokio::test]
async fn post_sends_a_json_body() {
    let server = MockServer::start().await;
    let message = json!({
        "body": "test 123",
        "messageType": "update",
        "recipient": { "type": "network", "EID": "08e1e1eadc000e6c" }
    });

    Mock::given(method("POST"))
        .and(path("/networks/08e1e1eadc000e6c/messages/"))
        .and(header("authorization", "Bearer my-app_my-secret"))
        .and(body_json(&message))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "EID": "msg-1" })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .post("/networks/08e1e1eadc000e6c/messages/", &message)
        .await
        .unwrap();
    assert_eq!(result["EID"], "msg-1");
}

#[tokio::test]
async fn post_action_sends_form_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/networks/08e1e1eadc000e6c/messages/msg-1/markread"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("read=true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "read": true })))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_client(&server)
        .post_action(
            "/networks/08e1e1eadc000e6c/messages/msg-1/markread",
            &[("read", "true")],
        )
        .await
        .unwrap();
    assert_eq!(result["read"], true);
}

#[tokio::test]
async fn put_sends_a_json_body() {
    let server = MockServer::start().await;
    let update = json!({ "body": "edited" });

    Mock::given(method("PUT"))
        .and(path("/networks/08e1e1eadc000e6c/messages/msg-1/"))
        .and(body_json(&update))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "EID": "msg-1" })))
        .mount(&server)
        .await;

    let result = test_client(&server)
        .put("/networks/08e1e1eadc000e6c/messages/msg-1/", &update)
        .await
        .unwrap();
    assert_eq!(result["EID"], "msg-1");
}

#[tokio::test]
async fn delete_hits_the_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/networks/08e1e1eadc000e6c/messages/msg-1/"))
        .and(header("authorization", "Bearer my-app_my-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .delete("/networks/08e1e1eadc000e6c/messages/msg-1/")
        .await
        .unwrap();
}

// ============================================================================
// Error envelope mapping
// ============================================================================

#[tokio::test]
async fn error_envelope_is_mapped_to_a_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/networks/08e1e1eadc000e6c/timeline/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "code": -26,
            "message": "Access denied"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .get("/networks/08e1e1eadc000e6c/timeline/")
        .await
        .unwrap_err();
    match err {
        ClientError::Api { code, message, status } => {
            assert_eq!(code, -26);
            assert_eq!(message, "Access denied");
            assert_eq!(status, 403);
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_error_reply_becomes_unexpected_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = test_client(&server).get("/status/").await.unwrap_err();
    match err {
        ClientError::Api { code, message, status } => {
            assert_eq!(code, UNEXPECTED_REPLY_CODE);
            assert_eq!(message, "Unexpected Reply");
            assert_eq!(status, 502);
        }
        other => panic!("expected an API error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_success_reply_is_an_error_too() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server).get("/status/").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Api { code, status: 200, .. } if code == UNEXPECTED_REPLY_CODE
    ));
}

#[tokio::test]
async fn envelope_without_the_expected_shape_becomes_unexpected_reply() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/status/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "nope" })))
        .mount(&server)
        .await;

    let err = test_client(&server).get("/status/").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::Api { code, status: 400, .. } if code == UNEXPECTED_REPLY_CODE
    ));
}

// ============================================================================
// Raw requests
// ============================================================================

#[tokio::test]
async fn raw_request_returns_status_and_bytes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/uploads/"))
        .and(header("authorization", "Bearer my-app_my-secret"))
        .and(header("content-type", "application/octet-stream"))
        .and(body_string("raw-bytes"))
        .respond_with(ResponseTemplate::new(201).set_body_string("created"))
        .expect(1)
        .mount(&server)
        .await;

    let (status, body) = test_client(&server)
        .request(
            Method::POST,
            "/uploads/",
            Some(b"raw-bytes".to_vec()),
            Some("application/octet-stream"),
        )
        .await
        .unwrap();
    assert_eq!(status, 201);
    assert_eq!(body, b"created");
}

#[tokio::test]
async fn raw_request_does_not_map_error_envelopes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "code": -14,
            "message": "Not found"
        })))
        .mount(&server)
        .await;

    let (status, body) = test_client(&server)
        .request(Method::GET, "/missing/", None, None)
        .await
        .unwrap();
    assert_eq!(status, 404);
    assert!(!body.is_empty());
}

// ============================================================================
// Signed-request validation through the client
// ============================================================================

#[test]
fn validate_signed_request_accepts_a_fresh_request() {
    let params = [
        ("appData", String::new()),
        ("issuedAt", format_issued_at(SystemClock.now())),
        ("locale", "en-US".to_owned()),
        ("networkEID", "08e1e1eadc000e6c".to_owned()),
        ("userEID", "08e1e1eead0dc968".to_owned()),
    ]
    .into_iter()
    .collect();
    let signed = RequestSigner::new("my-secret").unwrap().sign(&params).unwrap();

    let client = ColleagoClient::new(ClientConfig::new("my-app", "my-secret")).unwrap();
    client.validate_signed_request(&signed).unwrap();
    client.validate_signed_payload(&signed.to_payload()).unwrap();
}

#[test]
fn validate_signed_request_rejects_the_wrong_secret() {
    let params = [
        ("appData", String::new()),
        ("issuedAt", format_issued_at(SystemClock.now())),
        ("locale", "en-US".to_owned()),
        ("networkEID", "08e1e1eadc000e6c".to_owned()),
        ("userEID", "08e1e1eead0dc968".to_owned()),
    ]
    .into_iter()
    .collect();
    let signed = RequestSigner::new("other-secret").unwrap().sign(&params).unwrap();

    let client = ColleagoClient::new(ClientConfig::new("my-app", "my-secret")).unwrap();
    let err = client.validate_signed_request(&signed).unwrap_err();
    assert!(matches!(
        err,
        ClientError::SignedRequest(SignedRequestError::InvalidSignature)
    ));
}
