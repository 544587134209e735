use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Listing, User};
use crate::error::RepoError;
use crate::resource::ListingFilter;

/// Generic repository trait. Nothing in this system is ever deleted.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. Fails with [`RepoError::NotFound`] if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Listing repository.
#[async_trait]
pub trait ListingRepository: BaseRepository<Listing, Uuid> {
    /// Identifier for a listing about to be created.
    fn next_id(&self) -> Uuid {
        Uuid::new_v4()
    }

    /// One page of listings matching `filter`, plus the total match count.
    /// `page` is 1-based.
    async fn query_page(
        &self,
        filter: &ListingFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Listing>, u64), RepoError>;
}
