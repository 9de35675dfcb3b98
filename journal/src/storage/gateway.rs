//! Storage gateway
//!
//! Binds a key-value store to the single key holding the trip collection.
//! Every call is bounded by a timeout so a wedged device store surfaces as
//! `StorageUnavailable` instead of hanging the caller.

use super::KeyValueStore;
use crate::error::{AppError, Result};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct StorageGateway {
    store: Arc<dyn KeyValueStore>,
    key: String,
    timeout: Duration,
}

impl StorageGateway {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            store,
            key: key.into(),
            timeout,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw stored bytes, or `None` if the key was never written
    pub async fn read(&self) -> Result<Option<Vec<u8>>> {
        self.bounded("read", self.store.get(&self.key)).await
    }

    pub async fn write(&self, bytes: &[u8]) -> Result<()> {
        self.bounded("write", self.store.set(&self.key, bytes)).await
    }

    /// Forget the stored value, returning the gateway to its first-run state
    pub async fn clear(&self) -> Result<()> {
        self.bounded("clear", self.store.remove(&self.key)).await
    }

    async fn bounded<T>(&self, op: &str, fut: impl Future<Output = Result<T>>) -> Result<T> {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    "Storage {} of {} timed out after {:?}",
                    op,
                    self.key,
                    self.timeout
                );
                Err(AppError::StorageUnavailable(format!(
                    "{} of {} timed out after {:?}",
                    op, self.key, self.timeout
                )))
            }
        }
    }
}
