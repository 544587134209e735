#[cfg(test)]
mod tests {
    use crate::database::entity::listing;
    use crate::database::postgres_repo::PostgresListingRepository;
    use std::collections::BTreeMap;

    use chrono::Utc;
    use market_core::domain::Listing;
    use market_core::error::RepoError;
    use market_core::ports::{BaseRepository, ListingRepository};
    use market_core::resource::{ListingFilter, PriceRange};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn model(id: uuid::Uuid, owner_id: uuid::Uuid) -> listing::Model {
        listing::Model {
            id,
            title: "Brie Lovers".to_owned(),
            description: Some("Soft<br />and creamy".to_owned()),
            price: 1000,
            created_at: Utc::now().into(),
            is_published: false,
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_find_listing_by_id() {
        let listing_id = uuid::Uuid::new_v4();
        let owner_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(listing_id, owner_id)]])
            .into_connection();

        let repo = PostgresListingRepository::new(db);

        let result: Option<Listing> = repo.find_by_id(listing_id).await.unwrap();

        let listing = result.expect("listing should be found");
        assert_eq!(listing.id(), Some(listing_id));
        assert_eq!(listing.title.as_deref(), Some("Brie Lovers"));
        assert_eq!(listing.description(), Some("Soft<br />and creamy"));
        assert_eq!(listing.short_description().as_deref(), Some("Soft<br />..."));
        assert_eq!(listing.owner, Some(owner_id));
    }

    #[tokio::test]
    async fn test_insert_listing() {
        let listing_id = uuid::Uuid::new_v4();
        let owner_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model(listing_id, owner_id)]])
            .into_connection();
        let repo = PostgresListingRepository::new(db);

        let mut listing = Listing::new(Some("Brie Lovers".to_owned()), Utc::now());
        listing.price = Some(1000);
        listing.owner = Some(owner_id);
        listing.set_text_description("Soft\nand creamy");
        listing.assign_id(listing_id);

        let saved = repo.insert(listing).await.unwrap();
        assert_eq!(saved.id(), Some(listing_id));
        assert!(!saved.is_published());
    }

    #[tokio::test]
    async fn test_insert_rejects_incomplete_listing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PostgresListingRepository::new(db);

        let listing = Listing::new(Some("No price".to_owned()), Utc::now());
        let err = repo.insert(listing).await.unwrap_err();

        assert!(matches!(err, RepoError::Query(_)));
    }

    fn count_row(n: i64) -> BTreeMap<&'static str, Value> {
        BTreeMap::from([("num_items", Value::BigInt(Some(n)))])
    }

    #[tokio::test]
    async fn test_query_page_applies_filters_and_order() {
        let owner_id = uuid::Uuid::new_v4();
        let first = model(uuid::Uuid::new_v4(), owner_id);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count_row(4)]])
            .append_query_results([vec![first.clone()]])
            .into_connection();
        let repo = PostgresListingRepository::new(db);

        let filter = ListingFilter {
            is_published: Some(true),
            title: Some("Brie".to_owned()),
            description: Some("creamy".to_owned()),
            price: PriceRange {
                gt: Some(100),
                gte: Some(200),
                lt: Some(5000),
                lte: Some(4000),
            },
        };
        let (items, total) = repo.query_page(&filter, 2, 3).await.unwrap();

        assert_eq!(total, 4);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), Some(first.id));

        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains("num_items"));
        for expected in [
            "is_published",
            "LIKE",
            "%Brie%",
            "%creamy%",
            "> $",
            ">= $",
            "< $",
            "<= $",
            "ORDER BY",
            "LIMIT",
            "OFFSET",
        ] {
            assert!(log.contains(expected), "missing {expected} in {log}");
        }
        let order_by = &log[log.find("ORDER BY").unwrap()..];
        assert!(order_by.find("created_at").unwrap() < order_by.find("\\\"id\\\"").unwrap());
    }

    #[tokio::test]
    async fn test_query_page_rejects_page_past_range() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PostgresListingRepository::new(db);

        let err = repo
            .query_page(&ListingFilter::default(), u64::MAX, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, RepoError::Query(_)));
        assert!(repo.db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_update_listing() {
        let listing_id = uuid::Uuid::new_v4();
        let owner_id = uuid::Uuid::new_v4();
        let mut stored = model(listing_id, owner_id);
        stored.is_published = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![stored.clone()]])
            .into_connection();
        let repo = PostgresListingRepository::new(db);

        let saved = repo.update(Listing::from(stored)).await.unwrap();
        assert_eq!(saved.id(), Some(listing_id));
        assert!(saved.is_published());

        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains("UPDATE"));
        assert!(log.contains("RETURNING"));
    }

    #[tokio::test]
    async fn test_update_missing_listing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<listing::Model>::new()])
            .into_connection();
        let repo = PostgresListingRepository::new(db);

        let listing = Listing::from(model(uuid::Uuid::new_v4(), uuid::Uuid::new_v4()));
        let err = repo.update(listing).await.unwrap_err();

        assert!(matches!(err, RepoError::NotFound));
    }
}
