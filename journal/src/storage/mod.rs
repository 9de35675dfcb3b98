//! Storage module
//!
//! Key-value persistence for the trip collection. Two backends share the
//! `KeyValueStore` contract; the `StorageGateway` binds one key and bounds
//! every call with a timeout.

pub mod envelope;
pub mod file_store;
pub mod gateway;
pub mod sqlite_store;

pub use file_store::FileStore;
pub use gateway::StorageGateway;
pub use sqlite_store::SqliteStore;

use crate::error::Result;
use async_trait::async_trait;

/// Local persistent key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, or `None` if it was never written
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value atomically
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Forget `key`; succeeds if it was never written
    async fn remove(&self, key: &str) -> Result<()>;
}
