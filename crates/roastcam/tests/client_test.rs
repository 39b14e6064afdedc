//! Integration tests for the roast client against a mock endpoint.

use std::path::PathBuf;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use roastcam::{RoastClient, RoastError, RoastPersona, FALLBACK_ROAST};

/// Write a 1x1 JPEG capture into the temp dir and return its path.
fn tiny_capture(dir: &tempfile::TempDir) -> PathBuf {
    let path = dir.path().join("capture_1700000000.jpg");
    image::DynamicImage::new_rgb8(1, 1).save(&path).unwrap();
    path
}

fn completion_body(text: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": text } }
        ]
    })
}

#[tokio::test]
async fn roast_returns_model_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "test-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(
            "That cardigan is a subprime mortgage with sleeves.",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = tiny_capture(&dir);

    let client = RoastClient::new(&server.uri(), "test-key", "test-model").unwrap();
    let roast = client
        .try_roast(&image, &RoastPersona::sassy_cat())
        .await
        .unwrap();

    assert_eq!(roast, "That cardigan is a subprime mortgage with sleeves.");
}

#[tokio::test]
async fn request_carries_persona_and_inline_image() {
    let server = MockServer::start().await;
    let persona = RoastPersona::appraiser();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "temperature": 0.0,
            "messages": [
                { "role": "system", "content": persona.system_prompt },
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = tiny_capture(&dir);

    let client = RoastClient::new(&server.uri(), "test-key", "test-model").unwrap();
    client.try_roast(&image, &persona).await.unwrap();

    // The user message must carry the base64 payload as a data URL.
    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let url = body["messages"][1]["content"][1]["image_url"]["url"]
        .as_str()
        .unwrap();
    assert!(url.starts_with("data:image/jpeg;base64,"));
}

#[tokio::test]
async fn api_error_is_distinguishable_by_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = tiny_capture(&dir);

    let client = RoastClient::new(&server.uri(), "wrong-key", "test-model").unwrap();
    let err = client
        .try_roast(&image, &RoastPersona::default())
        .await
        .unwrap_err();

    match err {
        RoastError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "bad key");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_completion_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = tiny_capture(&dir);

    let client = RoastClient::new(&server.uri(), "test-key", "test-model").unwrap();
    let err = client
        .try_roast(&image, &RoastPersona::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RoastError::MalformedResponse(_)));
}

#[tokio::test]
async fn roast_image_falls_back_instead_of_failing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = tiny_capture(&dir);

    let client = RoastClient::new(&server.uri(), "test-key", "test-model").unwrap();
    let roast = client.roast_image(&image, &RoastPersona::default()).await;

    assert_eq!(roast, FALLBACK_ROAST);
    assert!(!roast.is_empty());
}

#[tokio::test]
async fn timeout_is_retried_exactly_once() {
    let server = MockServer::start().await;

    // First request stalls past the client timeout, then the mock expires.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("Second time lucky.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let image = tiny_capture(&dir);

    let client = RoastClient::with_timeout(
        &server.uri(),
        "test-key",
        "test-model",
        Duration::from_millis(250),
    )
    .unwrap();

    let roast = client
        .try_roast(&image, &RoastPersona::sassy_cat())
        .await
        .unwrap();

    assert_eq!(roast, "Second time lucky.");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn roast_image_falls_back_on_unreadable_file() {
    // No server involved: the read fails before any network call.
    let client = RoastClient::new("http://127.0.0.1:9", "test-key", "test-model").unwrap();
    let roast = client
        .roast_image(std::path::Path::new("/nonexistent/capture_0.jpg"), &RoastPersona::default())
        .await;

    assert_eq!(roast, FALLBACK_ROAST);
}
