//! Folder navigation and listing cache
//!
//! One folder view is live at a time. Navigating away discards it
//! unconditionally and re-fetches on re-entry; every mutation re-lists the
//! current folder instead of patching cached state, because the store's
//! mutation responses alone cannot reflect concurrent changes.
//!
//! Every issued listing carries the generation current at issue time, and a
//! completion is applied only if its generation is still the newest. A
//! delayed response for a folder the user already left can therefore never
//! overwrite the current view. The two-phase `begin_*`/`commit_listing` API
//! exists so an event loop (or a test) can interleave completions; the
//! async methods drive the common path through the same transitions.

use std::sync::Arc;

use bytes::Bytes;
use tracing::debug;

use studydrive_store::{RemoteObject, Result, StoreError};

use crate::service::{ParentRef, TreeService};

/// Lifecycle of the live folder view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    /// No folder navigated yet
    Idle,
    /// A listing for this folder is in flight
    Loading,
    Loaded,
    Errored,
}

/// The one live folder listing
#[derive(Debug, Clone)]
pub struct FolderView {
    pub folder: ParentRef,
    /// Children in store order (not guaranteed sorted)
    pub children: Vec<RemoteObject>,
    pub status: ViewStatus,
    /// Human-readable message when `status == Errored`
    pub error: Option<String>,
}

impl FolderView {
    fn idle() -> Self {
        Self {
            folder: ParentRef::Root,
            children: Vec::new(),
            status: ViewStatus::Idle,
            error: None,
        }
    }
}

/// Handle for an in-flight listing request
///
/// Carries the generation that was current when the listing was issued;
/// [`Navigator::commit_listing`] drops it if a newer listing has been
/// issued since.
#[derive(Debug)]
pub struct ListingTicket {
    generation: u64,
    folder: ParentRef,
}

impl ListingTicket {
    pub fn folder(&self) -> &ParentRef {
        &self.folder
    }
}

/// Owns the live [`FolderView`] and all transitions on it
///
/// State is mutated only through the methods below; the presentation layer
/// reads via [`Navigator::view`] and never writes.
pub struct Navigator {
    service: Arc<TreeService>,
    view: FolderView,
    generation: u64,
}

impl Navigator {
    pub fn new(service: Arc<TreeService>) -> Self {
        Self {
            service,
            view: FolderView::idle(),
            generation: 0,
        }
    }

    pub fn view(&self) -> &FolderView {
        &self.view
    }

    fn issue(&mut self, folder: ParentRef) -> ListingTicket {
        self.generation += 1;
        ListingTicket {
            generation: self.generation,
            folder,
        }
    }

    /// Start navigating to `folder`: the previous view is discarded and a
    /// fresh loading cycle begins. Returns the ticket for the listing the
    /// caller must now perform.
    pub fn begin_navigate(&mut self, folder: ParentRef) -> ListingTicket {
        self.view = FolderView {
            folder: folder.clone(),
            children: Vec::new(),
            status: ViewStatus::Loading,
            error: None,
        };
        self.issue(folder)
    }

    /// Start a re-fetch of the current folder (after a mutation)
    ///
    /// The prior listing stays visible while the refresh is in flight.
    pub fn begin_refresh(&mut self) -> ListingTicket {
        self.issue(self.view.folder.clone())
    }

    /// Apply a completed listing, unless it has been superseded
    ///
    /// Returns `false` when the result was dropped as stale.
    pub fn commit_listing(
        &mut self,
        ticket: ListingTicket,
        result: Result<Vec<RemoteObject>>,
    ) -> bool {
        if ticket.generation != self.generation {
            debug!(
                issued = ticket.generation,
                current = self.generation,
                "dropping stale listing response"
            );
            return false;
        }
        match result {
            Ok(children) => {
                self.view.children = children;
                self.view.status = ViewStatus::Loaded;
                self.view.error = None;
            }
            Err(err) => {
                // Children are left as they were so the presentation layer
                // can keep the prior listing visible under the banner.
                self.view.status = ViewStatus::Errored;
                self.view.error = Some(err.to_string());
            }
        }
        true
    }

    /// Navigate to a folder and wait for its listing
    pub async fn navigate(&mut self, folder: ParentRef) {
        let ticket = self.begin_navigate(folder);
        let result = self.service.list(ticket.folder()).await;
        self.commit_listing(ticket, result);
    }

    /// Re-list the current folder
    async fn refresh(&mut self) {
        let ticket = self.begin_refresh();
        let result = self.service.list(ticket.folder()).await;
        self.commit_listing(ticket, result);
    }

    /// Upload a file into the current folder, then re-establish the listing
    pub async fn upload_file(
        &mut self,
        name: &str,
        content_type: &str,
        content: Bytes,
    ) -> Result<RemoteObject> {
        let parent = self.view.folder.clone();
        let created = self
            .service
            .upload_file(&parent, name, content_type, content)
            .await
            .map_err(|e| self.mutation_failed(e))?;
        self.refresh().await;
        Ok(created)
    }

    /// Create a folder in the current folder, then re-fetch
    pub async fn create_folder(&mut self, name: &str) -> Result<RemoteObject> {
        let parent = self.view.folder.clone();
        let created = self
            .service
            .create_folder(&parent, name)
            .await
            .map_err(|e| self.mutation_failed(e))?;
        self.refresh().await;
        Ok(created)
    }

    /// Create a link in the current folder, then re-fetch
    pub async fn create_link(&mut self, name: &str, target_url: &str) -> Result<RemoteObject> {
        let parent = self.view.folder.clone();
        let created = self
            .service
            .create_link(&parent, name, target_url)
            .await
            .map_err(|e| self.mutation_failed(e))?;
        self.refresh().await;
        Ok(created)
    }

    /// Rename an entry, then re-fetch the current folder
    pub async fn rename(&mut self, id: &str, new_name: &str) -> Result<RemoteObject> {
        let renamed = self
            .service
            .rename(id, new_name)
            .await
            .map_err(|e| self.mutation_failed(e))?;
        self.refresh().await;
        Ok(renamed)
    }

    /// Delete an entry, then re-fetch the current folder
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.service
            .delete(id)
            .await
            .map_err(|e| self.mutation_failed(e))?;
        self.refresh().await;
        Ok(())
    }

    /// Record a failed mutation without touching the cached children
    fn mutation_failed(&mut self, err: StoreError) -> StoreError {
        self.view.status = ViewStatus::Errored;
        self.view.error = Some(err.to_string());
        err
    }
}
