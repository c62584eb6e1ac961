//! HTTP adapter for the remote object store
//!
//! Thin typed client over the store's REST API. Owns the credentials and all
//! request/response shaping; performs exactly one outbound request per
//! operation (plus bounded retries on transient faults) and no caching.
//!
//! The store has no native link concept. Links are encoded as ordinary
//! objects whose side-channel `properties` map carries `isLink = "true"` and
//! the target under `url`; decode mirrors that exactly and happens in one
//! place ([`WireObject::into_object`]), so nothing downstream ever inspects
//! raw metadata.

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::backend::ObjectStore;
use crate::error::{Result, StoreError};
use crate::object::{ObjectKind, RemoteObject};
use crate::retry::RetryPolicy;

/// Mime type the store uses for folders
pub const FOLDER_MIME: &str = "application/x-directory";

/// Mime type given to link carrier objects (they hold no real content)
pub const LINK_MIME: &str = "application/octet-stream";

/// Side-channel property marking an object as a link
const PROP_IS_LINK: &str = "isLink";

/// Side-channel property holding a link's target URL
const PROP_URL: &str = "url";

// ─── Wire Types ──────────────────────────────────────────────────────────

/// Object shape as the store reports it
#[derive(Debug, Deserialize)]
struct WireObject {
    id: String,
    name: String,
    #[serde(rename = "mimeType")]
    mime_type: String,
    #[serde(default)]
    size: Option<u64>,
    #[serde(rename = "createdAt", default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    parent: Option<String>,
    #[serde(rename = "viewUrl", default)]
    view_url: Option<String>,
    #[serde(default)]
    properties: HashMap<String, String>,
}

impl WireObject {
    /// Decode the store's native shape into the tagged domain model
    ///
    /// A property-marked link decodes as `Link` regardless of its native
    /// mime type, and its target overrides the native locator. Folder and
    /// link sizes are pinned to 0 whatever the store claims.
    fn into_object(self) -> RemoteObject {
        let is_link = self
            .properties
            .get(PROP_IS_LINK)
            .is_some_and(|v| v == "true");

        let kind = if is_link {
            ObjectKind::Link
        } else if self.mime_type == FOLDER_MIME {
            ObjectKind::Folder
        } else {
            ObjectKind::File
        };

        let link_target = if is_link {
            // Property target is authoritative; fall back to the native
            // locator so a Link never ends up with no target at all.
            self.properties
                .get(PROP_URL)
                .cloned()
                .or_else(|| self.view_url.clone())
        } else {
            None
        };

        let size = match kind {
            ObjectKind::File => self.size.unwrap_or(0),
            ObjectKind::Folder | ObjectKind::Link => 0,
        };

        RemoteObject {
            id: self.id,
            name: self.name,
            kind,
            parent_id: self.parent,
            size,
            content_type: self.mime_type,
            created_at: self.created_at.unwrap_or(DateTime::UNIX_EPOCH),
            view_url: self.view_url,
            link_target,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    files: Vec<WireObject>,
}

/// Metadata sent when creating an object
#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    #[serde(rename = "mimeType")]
    mime_type: &'a str,
    parent: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<HashMap<&'a str, &'a str>>,
}

#[derive(Debug, Serialize)]
struct RenameRequest<'a> {
    name: &'a str,
}

// ─── Adapter ─────────────────────────────────────────────────────────────

/// Typed HTTP client for the remote object store
pub struct HttpObjectStore {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
    key: SecretString,
    retry: RetryPolicy,
}

impl HttpObjectStore {
    /// Create an adapter for the store at `base_url`
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        key: SecretString,
    ) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            account_id: account_id.into(),
            key,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the retry policy, e.g. [`RetryPolicy::none`]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Attach credentials; every outbound request goes through here
    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.bearer_auth(self.key.expose_secret())
            .header("X-Account-Id", &self.account_id)
    }

    /// Map a response to a decoded body, folding status codes into the taxonomy
    async fn expect_object(response: reqwest::Response, context: &str) -> Result<RemoteObject> {
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(format!("{context}: id unknown upstream")));
        }
        if !status.is_success() {
            return Err(StoreError::upstream(format!("HTTP {status} for {context}")));
        }
        let wire: WireObject = response
            .json()
            .await
            .map_err(|e| StoreError::upstream(format!("malformed store response: {e}")))?;
        Ok(wire.into_object())
    }

    fn transport_err(context: &str, err: &reqwest::Error) -> StoreError {
        StoreError::upstream(format!("{context}: {err}"))
    }
}

#[async_trait::async_trait]
impl ObjectStore for HttpObjectStore {
    async fn list(&self, parent_id: &str) -> Result<Vec<RemoteObject>> {
        self.retry
            .run("list", || async {
                let response = self
                    .authed(self.client.get(self.url("/files")))
                    .query(&[("parent", parent_id)])
                    .send()
                    .await
                    .map_err(|e| Self::transport_err("list", &e))?;

                let status = response.status();
                if !status.is_success() {
                    return Err(StoreError::upstream(format!("HTTP {status} for list")));
                }

                let body: ListResponse = response
                    .json()
                    .await
                    .map_err(|e| StoreError::upstream(format!("malformed listing: {e}")))?;
                Ok(body.files.into_iter().map(WireObject::into_object).collect())
            })
            .await
    }

    async fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<RemoteObject> {
        self.retry
            .run("create_file", || async {
                let metadata = serde_json::to_string(&CreateRequest {
                    name,
                    mime_type: content_type,
                    parent: parent_id,
                    properties: None,
                })
                .map_err(|e| StoreError::upstream(format!("encode metadata: {e}")))?;

                let media = reqwest::multipart::Part::bytes(content.to_vec())
                    .file_name(name.to_string())
                    .mime_str(content_type)
                    .map_err(|e| StoreError::validation(format!("bad content type: {e}")))?;
                let form = reqwest::multipart::Form::new()
                    .text("metadata", metadata)
                    .part("media", media);

                let response = self
                    .authed(self.client.post(self.url("/files/upload")))
                    .multipart(form)
                    .send()
                    .await
                    .map_err(|e| Self::transport_err("create_file", &e))?;
                Self::expect_object(response, "create_file").await
            })
            .await
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<RemoteObject> {
        self.retry
            .run("create_folder", || async {
                let response = self
                    .authed(self.client.post(self.url("/files")))
                    .json(&CreateRequest {
                        name,
                        mime_type: FOLDER_MIME,
                        parent: parent_id,
                        properties: None,
                    })
                    .send()
                    .await
                    .map_err(|e| Self::transport_err("create_folder", &e))?;
                Self::expect_object(response, "create_folder").await
            })
            .await
    }

    async fn create_link(
        &self,
        parent_id: &str,
        name: &str,
        target_url: &str,
    ) -> Result<RemoteObject> {
        self.retry
            .run("create_link", || async {
                let properties =
                    HashMap::from([(PROP_IS_LINK, "true"), (PROP_URL, target_url)]);
                let response = self
                    .authed(self.client.post(self.url("/files")))
                    .json(&CreateRequest {
                        name,
                        mime_type: LINK_MIME,
                        parent: parent_id,
                        properties: Some(properties),
                    })
                    .send()
                    .await
                    .map_err(|e| Self::transport_err("create_link", &e))?;
                Self::expect_object(response, "create_link").await
            })
            .await
    }

    async fn rename(&self, id: &str, new_name: &str) -> Result<RemoteObject> {
        self.retry
            .run("rename", || async {
                let response = self
                    .authed(self.client.patch(self.url(&format!("/files/{id}"))))
                    .json(&RenameRequest { name: new_name })
                    .send()
                    .await
                    .map_err(|e| Self::transport_err("rename", &e))?;
                Self::expect_object(response, "rename").await
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.retry
            .run("delete", || async {
                let response = self
                    .authed(self.client.delete(self.url(&format!("/files/{id}"))))
                    .send()
                    .await
                    .map_err(|e| Self::transport_err("delete", &e))?;

                let status = response.status();
                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(StoreError::not_found(id));
                }
                if !status.is_success() {
                    return Err(StoreError::upstream(format!("HTTP {status} for delete")));
                }
                Ok(())
            })
            .await
    }
}
