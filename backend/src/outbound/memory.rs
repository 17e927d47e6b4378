//! Process-local repository adapters.
//!
//! Used when the server starts without a database URL and by the integration
//! suites. Each repository guards its map with a Tokio `RwLock`; the claim
//! check and the write happen under one write guard so concurrent claims on
//! the same item serialise exactly as the guarded SQL update does.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::lifecycle::ClaimTransition;
use crate::domain::ports::{
    ClaimWrite, ItemRepository, ItemRepositoryError, UserCreation, UserPersistenceError,
    UserRepository,
};
use crate::domain::{EmailAddress, Item, ItemId, ItemListQuery, NewUser, User, UserId};

/// In-memory item store.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: RwLock<HashMap<ItemId, Item>>,
}

impl InMemoryItemRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// Whether the store holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemRepositoryError> {
        Ok(self.items.read().await.get(id).cloned())
    }

    async fn list(&self, query: &ItemListQuery) -> Result<Vec<Item>, ItemRepositoryError> {
        let mut matching: Vec<Item> = self
            .items
            .read()
            .await
            .values()
            .filter(|item| query.matches(item))
            .cloned()
            .collect();
        matching.sort_by(|left, right| {
            right
                .created_at()
                .cmp(&left.created_at())
                .then_with(|| left.id().as_uuid().cmp(right.id().as_uuid()))
        });
        Ok(matching)
    }

    async fn insert(&self, item: &Item) -> Result<(), ItemRepositoryError> {
        let mut guard = self.items.write().await;
        if guard.contains_key(&item.id()) {
            return Err(ItemRepositoryError::query(format!(
                "unique violation: item {} already exists",
                item.id()
            )));
        }
        guard.insert(item.id(), item.clone());
        Ok(())
    }

    async fn apply_claim(
        &self,
        transition: &ClaimTransition,
    ) -> Result<ClaimWrite, ItemRepositoryError> {
        let mut guard = self.items.write().await;
        let Some(stored) = guard.get_mut(&transition.item_id) else {
            return Ok(ClaimWrite::Conflict);
        };
        if stored.status() != transition.expected_status {
            return Ok(ClaimWrite::Conflict);
        }
        *stored = transition.claimed.clone();
        Ok(ClaimWrite::Applied(stored.clone()))
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemRepositoryError> {
        Ok(self.items.write().await.remove(id).is_some())
    }
}

/// In-memory user store keyed by id with a unique email index.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[UserId]) -> Result<Vec<User>, UserPersistenceError> {
        let guard = self.users.read().await;
        Ok(ids.iter().filter_map(|id| guard.get(id).cloned()).collect())
    }

    async fn create(&self, user: &NewUser) -> Result<UserCreation, UserPersistenceError> {
        let mut guard = self.users.write().await;
        if let Some(existing) = guard.values().find(|stored| stored.email() == &user.email) {
            return Ok(UserCreation::Existing(existing.clone()));
        }
        let created = User::from_new(user.clone());
        guard.insert(created.id(), created.clone());
        Ok(UserCreation::Created(created))
    }
}
