//! Integration tests for the operation endpoints.
//!
//! Each test spins up an Axum server on a random port that imitates the
//! `predictLongRunning` / `fetchPredictOperation` contract and points a real
//! `VeoClient` at it.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use veo_client::{ClientError, OperationClient, StaticTokenProvider, VeoClient};
use veo_core::GenerationRequestBuilder;

const TOKEN: &str = "ya29.test-token";
const OPERATION: &str =
    "projects/test-project/locations/us-central1/publishers/google/models/veo-3.0-generate-preview/operations/op-123";

#[derive(Default)]
struct Recorded {
    calls: AtomicUsize,
    last_path: Mutex<Option<String>>,
    last_body: Mutex<Option<Value>>,
}

async fn fake_api(
    State(recorded): State<Arc<Recorded>>,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    recorded.calls.fetch_add(1, Ordering::SeqCst);
    *recorded.last_path.lock().unwrap() = Some(uri.path().to_string());

    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN));
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "missing bearer token").into_response();
    }

    let body: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
    *recorded.last_body.lock().unwrap() = Some(body.clone());

    if uri.path().ends_with(":predictLongRunning") {
        if body["instances"][0]["prompt"] == "reject me" {
            return (
                StatusCode::BAD_REQUEST,
                r#"{"error":{"code":400,"message":"Invalid prompt"}}"#,
            )
                .into_response();
        }
        return axum::Json(json!({ "name": OPERATION })).into_response();
    }

    if uri.path().ends_with(":fetchPredictOperation") {
        return match body["operationName"].as_str() {
            Some("op-done") => axum::Json(json!({
                "name": "op-done",
                "done": true,
                "response": { "predictions": [{ "uri": "gs://b/v.mp4" }] }
            }))
            .into_response(),
            Some("op-missing") => {
                (StatusCode::NOT_FOUND, "Operation not found").into_response()
            }
            Some(name) => axum::Json(json!({ "name": name })).into_response(),
            None => (StatusCode::BAD_REQUEST, "operationName required").into_response(),
        };
    }

    (StatusCode::NOT_FOUND, "no such method").into_response()
}

/// Start an Axum server on a random port, return (client, recorder).
async fn start_server(token: &str) -> (VeoClient, Arc<Recorded>) {
    let recorded = Arc::new(Recorded::default());
    let app = Router::new()
        .fallback(fake_api)
        .with_state(Arc::clone(&recorded));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start accepting connections.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = VeoClient::new("test-project", Arc::new(StaticTokenProvider::new(token)))
        .with_endpoint(format!("http://127.0.0.1:{}/v1", port));

    (client, recorded)
}

#[tokio::test]
async fn test_submit_returns_operation_handle() {
    let (client, recorded) = start_server(TOKEN).await;
    let request = GenerationRequestBuilder::new()
        .prompt("a dog running")
        .build()
        .unwrap();

    let handle = client.submit(&request.payload).await.unwrap();

    assert_eq!(handle, OPERATION);
    assert_eq!(
        recorded.last_path.lock().unwrap().as_deref(),
        Some(
            "/v1/projects/test-project/locations/us-central1/publishers/google/models/veo-3.0-generate-preview:predictLongRunning"
        )
    );
    let body = recorded.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body["instances"][0]["prompt"], "a dog running");
    assert_eq!(body["parameters"]["sampleCount"], 1);
    assert_eq!(body["parameters"]["durationSeconds"], 5);
}

#[tokio::test]
async fn test_submit_rejection_carries_status_and_body() {
    let (client, _) = start_server(TOKEN).await;
    let request = GenerationRequestBuilder::new()
        .prompt("reject me")
        .build()
        .unwrap();

    let err = client.submit(&request.payload).await.unwrap_err();

    match err {
        ClientError::Submission { status, message } => {
            assert_eq!(status, 400);
            assert!(message.contains("Invalid prompt"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_check_status_snapshots() {
    let (client, recorded) = start_server(TOKEN).await;

    let running = client.check_status("op-running").await.unwrap();
    assert_eq!(running.name, "op-running");
    assert!(!running.done);

    let done = client.check_status("op-done").await.unwrap();
    assert!(done.done);
    assert_eq!(done.artifacts()[0].uri.as_deref(), Some("gs://b/v.mp4"));

    let body = recorded.last_body.lock().unwrap().clone().unwrap();
    assert_eq!(body, json!({ "operationName": "op-done" }));
}

#[tokio::test]
async fn test_check_status_rejection() {
    let (client, _) = start_server(TOKEN).await;

    let err = client.check_status("op-missing").await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::StatusCheck { status: 404, ref message } if message == "Operation not found"
    ));
}

#[tokio::test]
async fn test_missing_credential_never_reaches_network() {
    let (client, recorded) = start_server("").await;

    let err = client.check_status("op-running").await.unwrap_err();

    assert!(matches!(err, ClientError::Auth(_)));
    assert_eq!(recorded.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_wrong_token_is_surfaced_as_auth_failure() {
    let (client, _) = start_server("ya29.stale").await;

    let err = client.check_status("op-running").await.unwrap_err();

    assert_eq!(err.status(), Some(401));
    assert!(err.is_auth_error());
}

#[tokio::test]
async fn test_unreachable_server_is_request_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = VeoClient::new("test-project", Arc::new(StaticTokenProvider::new(TOKEN)))
        .with_endpoint(format!("http://127.0.0.1:{}/v1", port));

    let err = client.check_status("op-running").await.unwrap_err();
    assert!(matches!(err, ClientError::RequestFailed(_)));
}
