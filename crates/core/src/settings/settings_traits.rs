//! Store traits for persisted configuration.

use crate::errors::Result;

/// Flat string key-value store the configuration is persisted in.
///
/// Values are JSON documents. Implementations only move strings around;
/// parsing and tolerance of malformed values live in the callers.
pub trait KeyValueStoreTrait: Send + Sync {
    /// Get a value by key. `Ok(None)` when the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}
