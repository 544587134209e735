//! In-memory listing store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use market_core::domain::Listing;
use market_core::error::RepoError;
use market_core::ports::{BaseRepository, ListingRepository};
use market_core::resource::ListingFilter;

/// Listings keyed by id, guarded by an async `RwLock`.
///
/// Writers hold the write lock for the whole insert/update, so there is a
/// single writer at a time. Data is lost on process restart.
pub struct InMemoryListingRepository {
    store: RwLock<HashMap<Uuid, Listing>>,
}

impl InMemoryListingRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryListingRepository {
    fn default() -> Self {
        Self::new()
    }
}

fn key(listing: &Listing) -> Result<Uuid, RepoError> {
    listing
        .id()
        .ok_or_else(|| RepoError::Query("listing has no id".to_string()))
}

#[async_trait]
impl BaseRepository<Listing, Uuid> for InMemoryListingRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Listing>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, listing: Listing) -> Result<Listing, RepoError> {
        let id = key(&listing)?;
        let mut store = self.store.write().await;

        if store.contains_key(&id) {
            return Err(RepoError::Constraint("Entity already exists".to_string()));
        }

        tracing::debug!(listing_id = %id, "Inserting listing");
        store.insert(id, listing.clone());
        Ok(listing)
    }

    async fn update(&self, listing: Listing) -> Result<Listing, RepoError> {
        let id = key(&listing)?;
        let mut store = self.store.write().await;
        let slot = store.get_mut(&id).ok_or(RepoError::NotFound)?;

        tracing::debug!(listing_id = %id, "Updating listing");
        *slot = listing.clone();
        Ok(listing)
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn query_page(
        &self,
        filter: &ListingFilter,
        page: u64,
        page_size: u64,
    ) -> Result<(Vec<Listing>, u64), RepoError> {
        let store = self.store.read().await;

        let mut matching: Vec<&Listing> = store.values().filter(|l| filter.matches(l)).collect();
        // Same order as the SQL store: oldest first, id as tie-breaker.
        matching.sort_by_key(|l| (l.created_at(), l.id()));

        let total = matching.len() as u64;
        let offset = page.saturating_sub(1).saturating_mul(page_size);
        let items = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(page_size).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use market_core::resource::PriceRange;

    fn listing(title: &str, price: i64, minutes_ago: i64) -> Listing {
        let mut listing = Listing::new(
            Some(title.to_string()),
            Utc::now() - Duration::minutes(minutes_ago),
        );
        listing.price = Some(price);
        listing.owner = Some(Uuid::new_v4());
        listing.assign_id(Uuid::new_v4());
        listing
    }

    async fn seeded() -> InMemoryListingRepository {
        let repo = InMemoryListingRepository::new();
        repo.insert(listing("Brie Lovers", 1000, 50)).await.unwrap();
        repo.insert(listing("Aged Gouda", 2500, 40)).await.unwrap();
        repo.insert(listing("Blue Stilton", 1800, 30)).await.unwrap();
        repo.insert(listing("Brie de Meaux", 3000, 20)).await.unwrap();
        repo
    }

    fn titles(items: &[Listing]) -> Vec<&str> {
        items.iter().filter_map(|l| l.title.as_deref()).collect()
    }

    #[tokio::test]
    async fn test_pages_in_creation_order() {
        let repo = seeded().await;
        let filter = ListingFilter::default();

        let (first, total) = repo.query_page(&filter, 1, 3).await.unwrap();
        assert_eq!(total, 4);
        assert_eq!(titles(&first), vec!["Brie Lovers", "Aged Gouda", "Blue Stilton"]);

        let (second, _) = repo.query_page(&filter, 2, 3).await.unwrap();
        assert_eq!(titles(&second), vec!["Brie de Meaux"]);

        let (beyond, total) = repo.query_page(&filter, 5, 3).await.unwrap();
        assert!(beyond.is_empty());
        assert_eq!(total, 4);
    }

    #[tokio::test]
    async fn test_filters() {
        let repo = seeded().await;

        let by_title = ListingFilter {
            title: Some("Brie".to_string()),
            ..ListingFilter::default()
        };
        let (items, total) = repo.query_page(&by_title, 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(titles(&items), vec!["Brie Lovers", "Brie de Meaux"]);

        let by_price = ListingFilter {
            price: PriceRange {
                gte: Some(1800),
                lt: Some(3000),
                ..PriceRange::default()
            },
            ..ListingFilter::default()
        };
        let (items, _) = repo.query_page(&by_price, 1, 10).await.unwrap();
        assert_eq!(titles(&items), vec!["Aged Gouda", "Blue Stilton"]);

        let published = ListingFilter {
            is_published: Some(true),
            ..ListingFilter::default()
        };
        let (items, total) = repo.query_page(&published, 1, 10).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let repo = InMemoryListingRepository::new();
        let err = repo.update(listing("Ghost", 1, 0)).await.unwrap_err();
        assert!(matches!(err, RepoError::NotFound));
    }

    #[tokio::test]
    async fn test_insert_requires_id() {
        let repo = InMemoryListingRepository::new();
        let err = repo
            .insert(Listing::new(Some("No id".to_string()), Utc::now()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Query(_)));
    }
}
