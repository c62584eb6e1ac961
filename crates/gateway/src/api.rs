//! REST surface for the virtual file tree
//!
//! One resource, `/files`, mirroring the directory-model operations:
//! list (GET), upload or create folder/link (POST), rename (PATCH),
//! delete (DELETE). Adapter errors propagate here unchanged and are mapped
//! once to a status code plus a single human-readable message.

use std::sync::Arc;

use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use studydrive_store::{RemoteObject, StoreError};
use studydrive_tree::{ParentRef, TreeService};

// Shared state
#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<TreeService>,
}

// Routes
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/files",
            get(list_files)
                .post(create_entry)
                .patch(rename_entry)
                .delete(delete_entry),
        )
        .with_state(state)
}

// ─── Wire DTOs ───────────────────────────────────────────────────────────

/// Decoded object as the presentation layer consumes it
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: String,
    pub name: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub content_type: String,
    pub upload_date: DateTime<Utc>,
    pub url: Option<String>,
    pub is_folder: bool,
    pub is_link: bool,
    /// `"root"` for entries directly under the configured root
    pub parent_id: String,
}

impl From<RemoteObject> for FileEntry {
    fn from(obj: RemoteObject) -> Self {
        Self {
            url: obj.url().map(ToString::to_string),
            is_folder: obj.is_folder(),
            is_link: obj.is_link(),
            parent_id: obj.parent_id.unwrap_or_else(|| "root".to_string()),
            id: obj.id,
            name: obj.name,
            size: obj.size,
            content_type: obj.content_type,
            upload_date: obj.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdQuery {
    id: Option<String>,
}

/// JSON body for folder/link creation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    name: Option<String>,
    url: Option<String>,
    parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RenameBody {
    name: Option<String>,
}

// ─── Error mapping ───────────────────────────────────────────────────────

fn error_response(err: &StoreError) -> Response {
    let status = match err {
        StoreError::Validation(_) => StatusCode::BAD_REQUEST,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
        StoreError::Upstream(_) => StatusCode::BAD_GATEWAY,
        StoreError::NotConfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() }))).into_response()
}

fn bad_request(msg: &str) -> Response {
    error_response(&StoreError::validation(msg))
}

// ─── Handlers ────────────────────────────────────────────────────────────

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "version": env!("CARGO_PKG_VERSION") }))
}

async fn list_files(State(state): State<AppState>, Query(query): Query<ListQuery>) -> Response {
    let parent = ParentRef::parse(query.parent_id.as_deref());
    match state.tree.list(&parent).await {
        Ok(children) => {
            let entries: Vec<FileEntry> = children.into_iter().map(FileEntry::from).collect();
            (StatusCode::OK, Json(entries)).into_response()
        }
        Err(err) => error_response(&err),
    }
}

/// POST `/files` dispatches on content type: multipart is a file upload,
/// JSON creates a folder or link. The split is what keeps link creation and
/// file upload mutually exclusive per request.
async fn create_entry(State(state): State<AppState>, request: Request) -> Response {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    if content_type.starts_with("multipart/form-data") {
        match Multipart::from_request(request, &()).await {
            Ok(multipart) => upload_file(&state, multipart).await,
            Err(err) => bad_request(&format!("malformed multipart body: {err}")),
        }
    } else if content_type.starts_with("application/json") {
        let Ok(Json(body)) = Json::<CreateBody>::from_request(request, &()).await else {
            return bad_request("malformed JSON body");
        };
        create_folder_or_link(&state, body).await
    } else {
        bad_request("expected multipart/form-data or application/json")
    }
}

async fn upload_file(state: &AppState, mut multipart: Multipart) -> Response {
    let mut parent_raw: Option<String> = None;
    let mut file: Option<(String, String, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return bad_request(&format!("malformed multipart body: {err}")),
        };
        match field.name() {
            Some("parentId") => match field.text().await {
                Ok(text) => parent_raw = Some(text),
                Err(err) => return bad_request(&format!("unreadable parentId field: {err}")),
            },
            Some("file") => {
                let name = field
                    .file_name()
                    .map_or_else(|| "Untitled".to_string(), ToString::to_string);
                let content_type = field.content_type().map_or_else(
                    || mime_guess::from_path(&name).first_or_octet_stream().to_string(),
                    ToString::to_string,
                );
                match field.bytes().await {
                    Ok(bytes) => file = Some((name, content_type, bytes)),
                    Err(err) => return bad_request(&format!("unreadable file field: {err}")),
                }
            }
            _ => {}
        }
    }

    let Some((name, content_type, content)) = file else {
        return bad_request("multipart upload requires a 'file' field");
    };
    let parent = ParentRef::parse(parent_raw.as_deref());

    match state
        .tree
        .upload_file(&parent, &name, &content_type, content)
        .await
    {
        Ok(created) => (StatusCode::CREATED, Json(FileEntry::from(created))).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn create_folder_or_link(state: &AppState, body: CreateBody) -> Response {
    let parent = ParentRef::parse(body.parent_id.as_deref());
    let name = body.name.unwrap_or_default();

    let result = match body.kind.as_deref() {
        Some("folder") => state.tree.create_folder(&parent, &name).await,
        Some("link") => {
            let url = body.url.unwrap_or_default();
            state.tree.create_link(&parent, &name, &url).await
        }
        _ => {
            return bad_request("'type' must be \"folder\" or \"link\"");
        }
    };

    match result {
        Ok(created) => (StatusCode::CREATED, Json(FileEntry::from(created))).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn rename_entry(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
    Json(body): Json<RenameBody>,
) -> Response {
    let Some(id) = query.id else {
        return bad_request("query parameter 'id' is required");
    };
    let Some(name) = body.name else {
        return bad_request("new name is required");
    };

    match state.tree.rename(&id, &name).await {
        Ok(renamed) => (StatusCode::OK, Json(FileEntry::from(renamed))).into_response(),
        Err(err) => error_response(&err),
    }
}

async fn delete_entry(State(state): State<AppState>, Query(query): Query<IdQuery>) -> Response {
    let Some(id) = query.id else {
        return bad_request("query parameter 'id' is required");
    };

    match state.tree.delete(&id).await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({ "message": "file deleted" })),
        )
            .into_response(),
        Err(err) => error_response(&err),
    }
}
