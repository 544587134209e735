//! Listing operations: the projector and validator wired to the stores.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::{Listing, User};
use crate::error::DomainError;
use crate::ports::{Clock, ListingRepository, UserRepository};
use crate::resource::{
    self, CollectionQuery, FieldProjector, ReadScope, Representation, WriteScope,
};

/// Default number of listings per collection page.
pub const DEFAULT_PAGE_SIZE: u64 = 3;

/// One page of projected listings.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingPage {
    pub items: Vec<Representation>,
    pub total_items: u64,
    pub page: u64,
    pub items_per_page: u64,
}

pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
    projector: FieldProjector,
    page_size: u64,
    /// One writer at a time per listing, held from load to save.
    write_locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
}

impl ListingService {
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
        projector: FieldProjector,
    ) -> Self {
        Self {
            listings,
            users,
            clock,
            projector,
            page_size: DEFAULT_PAGE_SIZE,
            write_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn projector(&self) -> &FieldProjector {
        &self.projector
    }

    /// `GET /listings`
    pub async fn list(&self, query: &CollectionQuery) -> Result<ListingPage, DomainError> {
        if query
            .page
            .saturating_sub(1)
            .checked_mul(self.page_size)
            .is_none()
        {
            return Err(DomainError::InvalidQuery(format!(
                "page {} is out of range",
                query.page
            )));
        }

        let (listings, total_items) = self
            .listings
            .query_page(&query.filter, query.page, self.page_size)
            .await?;

        let now = self.clock.now();
        let items = listings
            .iter()
            .map(|l| {
                self.projector.project_only(
                    l,
                    ReadScope::Collection,
                    now,
                    query.properties.as_deref(),
                )
            })
            .collect();

        Ok(ListingPage {
            items,
            total_items,
            page: query.page,
            items_per_page: self.page_size,
        })
    }

    /// `GET /listings/{id}`
    pub async fn get(&self, id: Uuid) -> Result<Representation, DomainError> {
        let listing = self.load(id).await?;
        Ok(self.project_item(&listing))
    }

    /// `POST /listings`
    pub async fn create(&self, payload: &Representation) -> Result<Representation, DomainError> {
        let mut listing = Listing::new(None, self.clock.now());
        self.apply_checked(payload, WriteScope::Create, &mut listing)
            .await?;

        listing.assign_id(self.listings.next_id());
        let saved = self.listings.insert(listing).await?;
        tracing::info!(listing_id = ?saved.id(), "Listing created");

        Ok(self.project_item(&saved))
    }

    /// `PUT /listings/{id}`
    pub async fn update(
        &self,
        id: Uuid,
        payload: &Representation,
    ) -> Result<Representation, DomainError> {
        self.write(id, payload, WriteScope::Update).await
    }

    /// `PUT /listings/{id}/publish`, the only way to change `isPublished`.
    pub async fn publish(
        &self,
        id: Uuid,
        payload: &Representation,
    ) -> Result<Representation, DomainError> {
        self.write(id, payload, WriteScope::Publish).await
    }

    async fn write(
        &self,
        id: Uuid,
        payload: &Representation,
        scope: WriteScope,
    ) -> Result<Representation, DomainError> {
        let guard = self.lock_listing(id).await;
        let result = self.write_locked(id, payload, scope).await;
        drop(guard);
        self.release_listing(id).await;
        result
    }

    async fn write_locked(
        &self,
        id: Uuid,
        payload: &Representation,
        scope: WriteScope,
    ) -> Result<Representation, DomainError> {
        let mut listing = self.load(id).await?;
        self.apply_checked(payload, scope, &mut listing).await?;

        let saved = self.listings.update(listing).await?;
        tracing::info!(listing_id = %id, ?scope, "Listing updated");

        Ok(self.project_item(&saved))
    }

    async fn lock_listing(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self.write_locks.lock().await.entry(id).or_default().clone();
        lock.lock_owned().await
    }

    // Drops the entry once no writer holds or waits on it. Clones only happen
    // under the map lock, so the count cannot grow behind our back.
    async fn release_listing(&self, id: Uuid) {
        let mut locks = self.write_locks.lock().await;
        if locks.get(&id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
            locks.remove(&id);
        }
    }

    /// Apply `payload` to the working copy, then validate it. The caller
    /// only persists when this returns `Ok`.
    async fn apply_checked(
        &self,
        payload: &Representation,
        scope: WriteScope,
        listing: &mut Listing,
    ) -> Result<(), DomainError> {
        let outcome = self.projector.apply(payload, scope, listing)?;
        if !outcome.ignored.is_empty() {
            tracing::debug!(ignored = ?outcome.ignored, ?scope, "Dropped fields outside the write projection");
        }

        let owner = self.resolve_owner(listing, scope).await?;
        let violations = resource::validate(listing, scope, owner.as_ref());
        if violations.is_empty() {
            return Ok(());
        }

        tracing::debug!(count = violations.len(), ?scope, "Listing failed validation");
        Err(DomainError::Validation(violations))
    }

    async fn resolve_owner(
        &self,
        listing: &Listing,
        scope: WriteScope,
    ) -> Result<Option<User>, DomainError> {
        let needs_owner = resource::constraints_for(scope)
            .iter()
            .any(|c| c.rule == resource::Rule::ExistingUser);

        match listing.owner {
            Some(owner_id) if needs_owner => Ok(self.users.find_by_id(owner_id).await?),
            _ => Ok(None),
        }
    }

    async fn load(&self, id: Uuid) -> Result<Listing, DomainError> {
        self.listings
            .find_by_id(id)
            .await?
            .ok_or(DomainError::NotFound {
                entity_type: "Listing",
                id,
            })
    }

    fn project_item(&self, listing: &Listing) -> Representation {
        self.projector
            .project(listing, ReadScope::Item, self.clock.now())
    }
}
