//! Object-store trait - every tree operation goes through this
//!
//! The trait is the seam between the virtual tree and whatever holds the
//! objects: the HTTP adapter in production, [`crate::MemoryStore`] in tests.
//! All operations are a single round-trip against the store; callers own
//! any caching or refetching policy.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;
use crate::object::RemoteObject;

/// Backend trait for the remote object store
///
/// Parent ids passed here are always *real* store ids; the root sentinel is
/// resolved by the tree layer before any call lands in an implementation.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List immediate children of a folder (no recursion)
    async fn list(&self, parent_id: &str) -> Result<Vec<RemoteObject>>;

    /// Upload a file; the store assigns the id
    async fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<RemoteObject>;

    /// Create an empty folder
    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<RemoteObject>;

    /// Create a link pseudo-file
    ///
    /// The store has no native link concept: implementations carry the kind
    /// marker and target URL in side-channel properties attached to the
    /// object, never in its primary content, and mirror that encoding on
    /// decode.
    async fn create_link(
        &self,
        parent_id: &str,
        name: &str,
        target_url: &str,
    ) -> Result<RemoteObject>;

    /// Rename an object in place; fails with `NotFound` if the id is gone
    async fn rename(&self, id: &str, new_name: &str) -> Result<RemoteObject>;

    /// Delete an object by id
    ///
    /// The store treats delete as terminal; a second delete of the same id
    /// yields `NotFound`. Callers decide whether that is fatal.
    async fn delete(&self, id: &str) -> Result<()>;
}
