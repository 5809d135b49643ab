use shared::AbsenceFormConfig;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::errors::AbsenceError;
use crate::storage::traits::KeyValueStorage;

/// Last submitted identity number per child.
///
/// Store failures never reach the caller: a failed read is "nothing cached"
/// and a failed write is dropped after logging.
#[derive(Clone)]
pub struct IdentityCache {
    storage: Arc<dyn KeyValueStorage>,
    key_prefix: String,
}

impl IdentityCache {
    pub fn new(storage: Arc<dyn KeyValueStorage>, key_prefix: impl Into<String>) -> Self {
        Self {
            storage,
            key_prefix: key_prefix.into(),
        }
    }

    /// Cache using the key prefix from the form configuration
    pub fn from_config(storage: Arc<dyn KeyValueStorage>, config: &AbsenceFormConfig) -> Self {
        Self::new(storage, config.cache_key_prefix.clone())
    }

    fn key(&self, child_id: &str) -> String {
        format!("{}{}", self.key_prefix, child_id)
    }

    /// Cached canonical identity number for a child, if any
    pub async fn get(&self, child_id: &str) -> Option<String> {
        match self.storage.get_value(&self.key(child_id)).await {
            Ok(value) => {
                debug!("Identity cache lookup for child {}: hit={}", child_id, value.is_some());
                value
            }
            Err(e) => {
                let error = AbsenceError::CacheUnavailable(e.to_string());
                warn!("Reading identity cache for child {} failed: {}", child_id, error);
                None
            }
        }
    }

    /// Remember the identity number submitted for a child (best effort)
    pub async fn set(&self, child_id: &str, canonical: &str) {
        match self.storage.put_value(&self.key(child_id), canonical).await {
            Ok(()) => info!("Cached identity number for child {}", child_id),
            Err(e) => {
                let error = AbsenceError::CacheUnavailable(e.to_string());
                warn!("Writing identity cache for child {} failed: {}", child_id, error);
            }
        }
    }
}
