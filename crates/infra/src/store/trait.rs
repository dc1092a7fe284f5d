use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Durable store operation error.
///
/// These are infrastructure failures (IO, database, poisoned locks), never
/// domain decisions. Callers treat them as recoverable.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend failure: {0}")]
    Backend(String),

    #[error("failed to serialize value for store: {0}")]
    Serialize(String),

    #[error("store lock poisoned")]
    Poisoned,
}

/// Key-value persistence facility.
///
/// - `save` fully overwrites any previous value under `key` (no versioning, no merge).
/// - `load` returns `Ok(None)` when nothing is stored under `key`.
/// - `remove` of a missing key is not an error.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S> DurableStore for Arc<S>
where
    S: DurableStore + ?Sized,
{
    async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).save(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove(key).await
    }
}
