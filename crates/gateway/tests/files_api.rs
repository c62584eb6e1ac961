//! End-to-end tests for the `/files` surface over an in-memory store

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{header::CONTENT_TYPE, Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use studydrive_gateway::{api, AppState};
use studydrive_store::MemoryStore;
use studydrive_tree::TreeService;

const ROOT_ID: &str = "root-id";

fn app() -> Router {
    let store = Arc::new(MemoryStore::with_root(ROOT_ID));
    let tree = Arc::new(TreeService::new(store, ROOT_ID));
    api::router(AppState { tree })
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload_request(parent: &str, file_name: &str, content_type: &str, content: &[u8]) -> Request<Body> {
    let boundary = "files-api-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"parentId\"\r\n\r\n{parent}\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/files")
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap()
}

async fn list(app: &Router, parent: &str) -> Vec<Value> {
    let (status, body) = send(
        app,
        Request::builder()
            .uri(format!("/files?parentId={parent}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(
        &app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn folder_round_trip_under_root() {
    let app = app();
    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/files",
            serde_json::json!({ "type": "folder", "name": "Lecture Notes", "parentId": "root" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["isFolder"], true);
    assert_eq!(created["size"], 0);
    assert_eq!(created["parentId"], "root");

    let entries = list(&app, "root").await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "Lecture Notes");
    assert_eq!(entries[0]["isFolder"], true);
    assert_eq!(entries[0]["id"], created["id"]);
}

#[tokio::test]
async fn upload_into_subfolder_reports_size() {
    let app = app();
    let (_, folder) = send(
        &app,
        json_request(
            Method::POST,
            "/files",
            serde_json::json!({ "type": "folder", "name": "F1", "parentId": "root" }),
        ),
    )
    .await;
    let folder_id = folder["id"].as_str().unwrap();

    let content = vec![0u8; 10_240];
    let (status, uploaded) = send(
        &app,
        upload_request(folder_id, "syllabus.pdf", "application/pdf", &content),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(uploaded["size"], 10_240);
    assert_eq!(uploaded["isFolder"], false);
    assert_eq!(uploaded["isLink"], false);
    assert_eq!(uploaded["type"], "application/pdf");

    let entries = list(&app, folder_id).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "syllabus.pdf");
    assert_eq!(entries[0]["size"], 10_240);
}

#[tokio::test]
async fn link_lists_back_with_original_target() {
    let app = app();
    let (status, created) = send(
        &app,
        json_request(
            Method::POST,
            "/files",
            serde_json::json!({
                "type": "link",
                "name": "Recording",
                "url": "https://example.com/video",
                "parentId": "root"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["isLink"], true);
    assert_eq!(created["url"], "https://example.com/video");
    assert_eq!(created["size"], 0);

    let entries = list(&app, "root").await;
    assert_eq!(entries[0]["isLink"], true);
    // The supplied target, never the store's native viewer link.
    assert_eq!(entries[0]["url"], "https://example.com/video");
}

#[tokio::test]
async fn rename_preserves_identity() {
    let app = app();
    let (_, folder) = send(
        &app,
        json_request(
            Method::POST,
            "/files",
            serde_json::json!({ "type": "folder", "name": "Old Notes", "parentId": "root" }),
        ),
    )
    .await;
    let id = folder["id"].as_str().unwrap().to_string();

    let (status, renamed) = send(
        &app,
        json_request(
            Method::PATCH,
            &format!("/files?id={id}"),
            serde_json::json!({ "name": "Updated Notes" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["id"], id.as_str());
    assert_eq!(renamed["name"], "Updated Notes");

    let entries = list(&app, "root").await;
    assert_eq!(entries[0]["id"], id.as_str());
    assert_eq!(entries[0]["name"], "Updated Notes");
}

#[tokio::test]
async fn delete_removes_entry_and_repeats_safely() {
    let app = app();
    let (_, folder) = send(
        &app,
        json_request(
            Method::POST,
            "/files",
            serde_json::json!({ "type": "folder", "name": "Temp", "parentId": "root" }),
        ),
    )
    .await;
    let id = folder["id"].as_str().unwrap().to_string();

    let delete = |id: String| {
        Request::builder()
            .method(Method::DELETE)
            .uri(format!("/files?id={id}"))
            .body(Body::empty())
            .unwrap()
    };

    let (status, body) = send(&app, delete(id.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());
    assert!(list(&app, "root").await.is_empty());

    // Second delete of the same id resolves without error.
    let (status, _) = send(&app, delete(id)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_type_discriminator_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/files",
            serde_json::json!({ "type": "shortcut", "name": "x", "parentId": "root" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn empty_name_is_rejected() {
    let app = app();
    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/files",
            serde_json::json!({ "type": "folder", "name": "", "parentId": "root" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(list(&app, "root").await.is_empty());
}

#[tokio::test]
async fn rename_requires_id_and_name() {
    let app = app();
    let (status, _) = send(
        &app,
        json_request(Method::PATCH, "/files", serde_json::json!({ "name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        json_request(Method::PATCH, "/files?id=abc", serde_json::json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rename_of_unknown_id_is_not_found() {
    let app = app();
    let (status, body) = send(
        &app,
        json_request(
            Method::PATCH,
            "/files?id=does-not-exist",
            serde_json::json!({ "name": "x" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn delete_requires_id() {
    let app = app();
    let (status, _) = send(
        &app,
        Request::builder()
            .method(Method::DELETE)
            .uri("/files")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let app = app();
    let boundary = "files-api-test-boundary";
    let body = format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"parentId\"\r\n\r\nroot\r\n--{boundary}--\r\n"
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/files")
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"))
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("file"));
}

#[tokio::test]
async fn unsupported_content_type_is_rejected() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/files")
        .header(CONTENT_TYPE, "text/plain")
        .body(Body::from("hello"))
        .unwrap();

    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
