//! Progress storage backends.
//!
//! The persisted document is an opaque string blob stored under a single
//! well-known key. Backends only need `get` and `set`.

pub mod memory;
pub mod file;

/// Trait for key-value progress storage.
///
/// `set` takes `&self`: backends own their synchronization, the way a host
/// key-value store would.
pub trait ProgressStore {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the blob stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for &S {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }
}

impl<S: ProgressStore + ?Sized> ProgressStore for std::sync::Arc<S> {
    type Error = S::Error;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set(key, value)
    }
}

pub use memory::InMemoryProgressStore;
pub use file::{FileProgressStore, FileStoreError};
