//! Domain model for remote objects
//!
//! The store natively knows files and folders; links are a studydrive
//! convention carried in side-channel properties and decoded exactly once,
//! at the adapter boundary, into the tagged [`ObjectKind`] below. Nothing
//! downstream inspects raw metadata again.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a tree entry, decoded at the adapter boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    File,
    Folder,
    Link,
}

/// A single object in the remote store, as seen by the tree layer
///
/// Invariants upheld by the decoding path:
/// - `kind == Link` implies `link_target` is present
/// - `kind == Folder` or `kind == Link` implies `size == 0`
/// - `id` is store-assigned and never changes; rename touches `name` only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteObject {
    /// Opaque store-assigned identifier
    pub id: String,
    pub name: String,
    pub kind: ObjectKind,
    /// Parent id; the configured root is never itself listed as a child
    pub parent_id: Option<String>,
    /// Content size in bytes (0 for folders and links)
    pub size: u64,
    /// Mime type reported by the store
    pub content_type: String,
    pub created_at: DateTime<Utc>,
    /// Store-native viewable URL
    pub view_url: Option<String>,
    /// Link target carried in side-channel properties; present iff kind is Link
    pub link_target: Option<String>,
}

impl RemoteObject {
    /// The URL the presentation layer should open for this entry
    ///
    /// For links the side-channel target is authoritative over whatever
    /// native locator the store reports.
    pub fn url(&self) -> Option<&str> {
        match self.kind {
            ObjectKind::Link => self.link_target.as_deref(),
            ObjectKind::File | ObjectKind::Folder => self.view_url.as_deref(),
        }
    }

    pub fn is_folder(&self) -> bool {
        self.kind == ObjectKind::Folder
    }

    pub fn is_link(&self) -> bool {
        self.kind == ObjectKind::Link
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link_object() -> RemoteObject {
        RemoteObject {
            id: "l1".into(),
            name: "Recording".into(),
            kind: ObjectKind::Link,
            parent_id: Some("root-id".into()),
            size: 0,
            content_type: "application/octet-stream".into(),
            created_at: Utc::now(),
            view_url: Some("https://store.example/view/l1".into()),
            link_target: Some("https://example.com/video".into()),
        }
    }

    #[test]
    fn link_url_prefers_target_over_native_locator() {
        let obj = link_object();
        assert_eq!(obj.url(), Some("https://example.com/video"));
    }

    #[test]
    fn file_url_is_the_native_locator() {
        let obj = RemoteObject {
            kind: ObjectKind::File,
            link_target: None,
            ..link_object()
        };
        assert_eq!(obj.url(), Some("https://store.example/view/l1"));
    }

    #[test]
    fn kind_predicates() {
        let obj = link_object();
        assert!(obj.is_link());
        assert!(!obj.is_folder());
    }
}
