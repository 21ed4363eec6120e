//! In-memory ephemeral storage backend

use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;

use crate::model::{User, UserUpdate};
use crate::traits::{RecordStore, StoreError};

/// Ephemeral (in-memory) record store
pub struct EphemeralStore {
    users: DashMap<String, User>,
}

impl Default for EphemeralStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EphemeralStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl RecordStore for EphemeralStore {
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.users.iter().map(|r| r.value().clone()).collect())
    }

    async fn get(&self, id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(id).map(|r| r.value().clone()))
    }

    async fn put(&self, user: User) -> Result<(), StoreError> {
        debug!(id = %user.id, "Storing user");
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn update(&self, id: &str, update: UserUpdate) -> Result<User, StoreError> {
        // get_mut holds the shard lock for the whole read-modify-write
        let mut entry = self
            .users
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        entry.apply(update);
        Ok(entry.value().clone())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let removed = self.users.remove(id).is_some();
        debug!(id = %id, removed, "Deleted user");
        Ok(())
    }
}
