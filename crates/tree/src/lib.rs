pub mod navigator;
pub mod service;

pub use navigator::{FolderView, ListingTicket, Navigator, ViewStatus};
pub use service::{ParentRef, TreeService};
