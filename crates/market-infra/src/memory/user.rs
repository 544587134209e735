//! In-memory user store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use market_core::domain::User;
use market_core::error::RepoError;
use market_core::ports::{BaseRepository, UserRepository};

/// Users keyed by id. Data is lost on process restart.
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store.values().any(|u| u.email == user.email) || store.contains_key(&user.id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;
        let slot = store.get_mut(&user.id).ok_or(RepoError::NotFound)?;
        *slot = user.clone();
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_insert_and_find() {
        let repo = InMemoryUserRepository::new();
        let user = repo
            .insert(User::new("alice@example.com".to_string(), Utc::now()))
            .await
            .unwrap();

        assert_eq!(repo.find_by_id(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(
            repo.find_by_email("alice@example.com").await.unwrap(),
            Some(user)
        );
        assert_eq!(repo.find_by_email("bob@example.com").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.insert(User::new("alice@example.com".to_string(), Utc::now()))
            .await
            .unwrap();

        let err = repo
            .insert(User::new("alice@example.com".to_string(), Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }
}
