use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use toplist_core::UserId;

use crate::error::StoreError;

/// Referenced user identity: ranks and comments point at users by id only,
/// never embed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
}

/// Document-store boundary for the user collection.
///
/// Account lifecycle belongs to the external identity provider; this store
/// only mirrors verified identities for display-name resolution.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn upsert(&self, user: UserRecord) -> Result<(), StoreError>;

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError>;

    /// Batch lookup used when resolving authors; unknown ids are simply
    /// absent from the result.
    async fn get_many(&self, ids: &[UserId]) -> Result<HashMap<UserId, UserRecord>, StoreError>;

    /// All known users, ordered by username.
    async fn list(&self) -> Result<Vec<UserRecord>, StoreError>;
}

/// In-memory user collection for dev/test.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_poisoned() -> StoreError {
        StoreError::backend("lock poisoned")
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn upsert(&self, user: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(|_| Self::lock_poisoned())?;
        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().map_err(|_| Self::lock_poisoned())?;
        Ok(users.get(&id).cloned())
    }

    async fn get_many(&self, ids: &[UserId]) -> Result<HashMap<UserId, UserRecord>, StoreError> {
        let users = self.users.read().map_err(|_| Self::lock_poisoned())?;
        Ok(ids
            .iter()
            .filter_map(|id| users.get(id).map(|u| (*id, u.clone())))
            .collect())
    }

    async fn list(&self) -> Result<Vec<UserRecord>, StoreError> {
        let users = self.users.read().map_err(|_| Self::lock_poisoned())?;
        let mut all: Vec<UserRecord> = users.values().cloned().collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> UserRecord {
        UserRecord {
            id: UserId::new(),
            username: name.to_string(),
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_the_username() {
        let store = InMemoryUserStore::new();
        let mut rec = user("old-name");
        store.upsert(rec.clone()).await.unwrap();

        rec.username = "new-name".to_string();
        store.upsert(rec.clone()).await.unwrap();

        assert_eq!(store.get(rec.id).await.unwrap().unwrap().username, "new-name");
    }

    #[tokio::test]
    async fn get_many_skips_unknown_ids() {
        let store = InMemoryUserStore::new();
        let known = user("known");
        store.upsert(known.clone()).await.unwrap();

        let missing = UserId::new();
        let found = store.get_many(&[known.id, missing]).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found.get(&known.id), Some(&known));
        assert!(!found.contains_key(&missing));
    }

    #[tokio::test]
    async fn list_is_ordered_by_username() {
        let store = InMemoryUserStore::new();
        for name in ["carol", "alice", "bob"] {
            store.upsert(user(name)).await.unwrap();
        }

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }
}
