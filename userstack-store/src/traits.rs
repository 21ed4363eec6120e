//! Storage backend trait

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{User, UserUpdate};

/// Errors from storage operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("User not found: {0}")]
    NotFound(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Malformed record {id}: {reason}")]
    MalformedRecord { id: String, reason: String },
}

/// A key-value collection of user records addressed by `id`
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Full scan, unordered, unfiltered
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<User>, StoreError>;

    /// Insert or replace a record
    async fn put(&self, user: User) -> Result<(), StoreError>;

    /// Replace `name`/`email` of an existing record and return the new record.
    /// Fails with [`StoreError::NotFound`] if no record has this `id`.
    async fn update(&self, id: &str, update: UserUpdate) -> Result<User, StoreError>;

    /// Remove a record; removing a missing `id` succeeds
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
