pub mod backend;
pub mod error;
pub mod http;
pub mod memory;
pub mod object;
pub mod retry;

pub use backend::ObjectStore;
pub use error::{Result, StoreError};
pub use http::HttpObjectStore;
pub use memory::MemoryStore;
pub use object::{ObjectKind, RemoteObject};
pub use retry::RetryPolicy;
