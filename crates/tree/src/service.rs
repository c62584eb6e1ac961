//! Virtual tree service
//!
//! Presents a kind-tagged, parent-scoped tree API on top of an
//! [`ObjectStore`]. This is the only layer that knows the real root folder
//! id: callers speak in [`ParentRef`] and the sentinel is resolved here, at
//! a single point, before any store call. Requests that can be rejected
//! locally (empty names, empty link targets) never reach the network.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use studydrive_store::{ObjectStore, RemoteObject, Result, StoreError};

/// Parent reference as the presentation layer sees it
///
/// `Root` stands for "the configured top-level folder" and is resolved to
/// the real store id by [`TreeService`]; it never leaks into store calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParentRef {
    Root,
    Folder(String),
}

impl ParentRef {
    /// Parse a wire-level parent reference; absent, empty, or `"root"`
    /// all mean the root.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("" | "root") => Self::Root,
            Some(id) => Self::Folder(id.to_string()),
        }
    }

    pub fn is_root(&self) -> bool {
        matches!(self, Self::Root)
    }
}

/// Translates directory-model operations into store calls
pub struct TreeService {
    store: Arc<dyn ObjectStore>,
    root_id: String,
}

impl TreeService {
    pub fn new(store: Arc<dyn ObjectStore>, root_id: impl Into<String>) -> Self {
        Self {
            store,
            root_id: root_id.into(),
        }
    }

    /// Resolve a parent reference to a real store id
    fn resolve<'a>(&'a self, parent: &'a ParentRef) -> &'a str {
        match parent {
            ParentRef::Root => &self.root_id,
            ParentRef::Folder(id) => id,
        }
    }

    /// Map the real root id back to the sentinel on the way out, so the
    /// presentation layer never sees (or navigates by) the configured id.
    fn sentinelize(&self, mut object: RemoteObject) -> RemoteObject {
        if object.parent_id.as_deref() == Some(self.root_id.as_str()) {
            object.parent_id = None;
        }
        object
    }

    fn require_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(StoreError::validation("name must not be empty"));
        }
        Ok(())
    }

    fn require_id(id: &str) -> Result<()> {
        if id.trim().is_empty() {
            return Err(StoreError::validation("object id is required"));
        }
        Ok(())
    }

    /// List the immediate children of a folder
    pub async fn list(&self, parent: &ParentRef) -> Result<Vec<RemoteObject>> {
        let children = self.store.list(self.resolve(parent)).await?;
        Ok(children.into_iter().map(|o| self.sentinelize(o)).collect())
    }

    /// Upload a file under a folder
    pub async fn upload_file(
        &self,
        parent: &ParentRef,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<RemoteObject> {
        Self::require_name(name)?;
        let object = self
            .store
            .create_file(self.resolve(parent), name, content_type, content)
            .await?;
        Ok(self.sentinelize(object))
    }

    /// Create an empty folder
    pub async fn create_folder(&self, parent: &ParentRef, name: &str) -> Result<RemoteObject> {
        Self::require_name(name)?;
        let object = self.store.create_folder(self.resolve(parent), name).await?;
        Ok(self.sentinelize(object))
    }

    /// Create a link pseudo-file
    ///
    /// A link never carries content: the operation is metadata-only, which
    /// is what keeps link creation and file upload mutually exclusive per
    /// request.
    pub async fn create_link(
        &self,
        parent: &ParentRef,
        name: &str,
        target_url: &str,
    ) -> Result<RemoteObject> {
        Self::require_name(name)?;
        if target_url.trim().is_empty() {
            return Err(StoreError::validation("link target URL must not be empty"));
        }
        let object = self
            .store
            .create_link(self.resolve(parent), name, target_url)
            .await?;
        Ok(self.sentinelize(object))
    }

    /// Rename an object; the id is immutable, only the name changes
    pub async fn rename(&self, id: &str, new_name: &str) -> Result<RemoteObject> {
        Self::require_id(id)?;
        Self::require_name(new_name)?;
        let object = self.store.rename(id, new_name).await?;
        Ok(self.sentinelize(object))
    }

    /// Delete an object by id
    ///
    /// The store reports `NotFound` when the id is already gone (including
    /// a repeated delete); that is success from the tree's point of view.
    pub async fn delete(&self, id: &str) -> Result<()> {
        Self::require_id(id)?;
        match self.store.delete(id).await {
            Ok(()) => Ok(()),
            Err(err) if err.is_not_found() => {
                debug!(id, "delete target already gone, treating as success");
                Ok(())
            }
            Err(err) => Err(err),
        }
    }
}
