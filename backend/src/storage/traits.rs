//! # Storage Traits
//!
//! Abstraction over the key-value store the identity cache lives in.

use anyhow::Result;
use async_trait::async_trait;

/// Asynchronous string key-value store
///
/// Implementations may fail; callers in the domain decide whether a failure
/// matters. Writing an existing key replaces its value.
#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    /// Retrieve the value stored under `key`
    async fn get_value(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn put_value(&self, key: &str, value: &str) -> Result<()>;
}
