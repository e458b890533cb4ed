//! Storage layer
//!
//! The book collection is mirrored to a string-keyed storage backend as a
//! single JSON blob. Backends implement [`KeyValueStorage`]:
//!
//! - **FileStorage**: one file per key in the data directory
//! - **MemoryStorage**: in-process map, used by tests and dry runs

pub mod error;
pub mod memory;
pub mod persistence;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use persistence::FileStorage;

/// String key-value backend
///
/// Mirrors the browser local storage contract: values are opaque strings,
/// removing an absent key is not an error.
pub trait KeyValueStorage {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete `key`
    fn remove(&mut self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}
