//! In-memory object store for testing
//!
//! Mirrors the remote store's observable behavior (store-assigned ids,
//! parent validation, terminal deletes, listing in store order) without any
//! network I/O. Used by the tree and gateway tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use crate::backend::ObjectStore;
use crate::error::{Result, StoreError};
use crate::http::{FOLDER_MIME, LINK_MIME};
use crate::object::{ObjectKind, RemoteObject};

/// Stored entry plus its insertion rank ("store order")
struct Entry {
    object: RemoteObject,
    seq: u64,
}

/// In-memory object store
///
/// All data is lost when the store is dropped. Thread-safe via an internal
/// `RwLock`.
pub struct MemoryStore {
    root_id: String,
    entries: RwLock<HashMap<String, Entry>>,
    next_seq: RwLock<u64>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a store with a generated root folder id
    pub fn new() -> Self {
        Self::with_root(Uuid::new_v4().to_string())
    }

    /// Create a store with a fixed root folder id
    pub fn with_root(root_id: impl Into<String>) -> Self {
        Self {
            root_id: root_id.into(),
            entries: RwLock::new(HashMap::new()),
            next_seq: RwLock::new(0),
        }
    }

    /// The real id of the top-level folder (never listed as a child)
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// A parent is valid if it is the root or an existing folder
    fn check_parent(&self, parent_id: &str) -> Result<()> {
        if parent_id == self.root_id {
            return Ok(());
        }
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::upstream("lock poisoned"))?;
        match entries.get(parent_id) {
            Some(entry) if entry.object.kind == ObjectKind::Folder => Ok(()),
            Some(_) => Err(StoreError::upstream(format!("parent {parent_id} is not a folder"))),
            None => Err(StoreError::upstream(format!("invalid parent {parent_id}"))),
        }
    }

    fn insert(&self, object: RemoteObject) -> Result<RemoteObject> {
        let seq = {
            let mut next = self
                .next_seq
                .write()
                .map_err(|_| StoreError::upstream("lock poisoned"))?;
            *next += 1;
            *next
        };
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::upstream("lock poisoned"))?;
        entries.insert(object.id.clone(), Entry { object: object.clone(), seq });
        Ok(object)
    }

    fn new_object(
        &self,
        parent_id: &str,
        name: &str,
        kind: ObjectKind,
        content_type: &str,
        size: u64,
        link_target: Option<String>,
    ) -> RemoteObject {
        let id = Uuid::new_v4().to_string();
        RemoteObject {
            view_url: Some(format!("memory://view/{id}")),
            id,
            name: name.to_string(),
            kind,
            parent_id: Some(parent_id.to_string()),
            size,
            content_type: content_type.to_string(),
            created_at: Utc::now(),
            link_target,
        }
    }
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn list(&self, parent_id: &str) -> Result<Vec<RemoteObject>> {
        self.check_parent(parent_id)?;
        let entries = self
            .entries
            .read()
            .map_err(|_| StoreError::upstream("lock poisoned"))?;

        let mut children: Vec<(u64, RemoteObject)> = entries
            .values()
            .filter(|e| e.object.parent_id.as_deref() == Some(parent_id))
            .map(|e| (e.seq, e.object.clone()))
            .collect();
        children.sort_by_key(|(seq, _)| *seq);
        Ok(children.into_iter().map(|(_, obj)| obj).collect())
    }

    async fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<RemoteObject> {
        self.check_parent(parent_id)?;
        let object = self.new_object(
            parent_id,
            name,
            ObjectKind::File,
            content_type,
            content.len() as u64,
            None,
        );
        self.insert(object)
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<RemoteObject> {
        self.check_parent(parent_id)?;
        let object = self.new_object(parent_id, name, ObjectKind::Folder, FOLDER_MIME, 0, None);
        self.insert(object)
    }

    async fn create_link(
        &self,
        parent_id: &str,
        name: &str,
        target_url: &str,
    ) -> Result<RemoteObject> {
        self.check_parent(parent_id)?;
        let object = self.new_object(
            parent_id,
            name,
            ObjectKind::Link,
            LINK_MIME,
            0,
            Some(target_url.to_string()),
        );
        self.insert(object)
    }

    async fn rename(&self, id: &str, new_name: &str) -> Result<RemoteObject> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::upstream("lock poisoned"))?;
        let entry = entries.get_mut(id).ok_or_else(|| StoreError::not_found(id))?;
        entry.object.name = new_name.to_string();
        Ok(entry.object.clone())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| StoreError::upstream("lock poisoned"))?;
        entries
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(id))
    }
}
