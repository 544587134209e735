//! Application state - shared across all handlers.

use std::sync::Arc;

use market_core::ports::{Clock, ListingRepository, UserRepository};
use market_core::resource::FieldProjector;
use market_core::service::ListingService;
use market_infra::{InMemoryListingRepository, InMemoryUserRepository, SystemClock};

use crate::config::{AppConfig, ListingsConfig};

#[cfg(feature = "postgres")]
use market_infra::database::DatabaseConnections;
#[cfg(feature = "postgres")]
use market_infra::{PostgresListingRepository, PostgresUserRepository};
#[cfg(feature = "postgres")]
use migration::{DbErr, Migrator, MigratorTrait};

type Stores = (Arc<dyn ListingRepository>, Arc<dyn UserRepository>);

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<ListingService>,
    pub users: Arc<dyn UserRepository>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let (listings, users): Stores = match &config.database {
            Some(db_config) => match connect(db_config).await {
                Ok(stores) => stores,
                Err(e) => {
                    tracing::error!(
                        "Failed to prepare database: {}. Using in-memory fallback.",
                        e
                    );
                    in_memory_stores()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                in_memory_stores()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (listings, users): Stores = {
            if config.database.is_some() {
                tracing::warn!("DATABASE_URL ignored: built without postgres feature");
            }
            tracing::info!("Running without postgres feature - using in-memory repositories");
            in_memory_stores()
        };

        let state = Self::from_stores(listings, users, config.listings);
        tracing::info!(
            page_size = config.listings.page_size,
            unknown_fields = ?config.listings.unknown_fields,
            "Application state initialized"
        );
        state
    }

    /// State backed by fresh in-memory stores.
    pub fn in_memory(listings_config: ListingsConfig) -> Self {
        let (listings, users) = in_memory_stores();
        Self::from_stores(listings, users, listings_config)
    }

    fn from_stores(
        listings: Arc<dyn ListingRepository>,
        users: Arc<dyn UserRepository>,
        listings_config: ListingsConfig,
    ) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let service = ListingService::new(
            listings,
            users.clone(),
            clock.clone(),
            FieldProjector::new(listings_config.unknown_fields),
        )
        .with_page_size(listings_config.page_size);

        Self {
            listings: Arc::new(service),
            users,
            clock,
        }
    }
}

fn in_memory_stores() -> Stores {
    (
        Arc::new(InMemoryListingRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
    )
}

#[cfg(feature = "postgres")]
async fn connect(config: &market_infra::DatabaseConfig) -> Result<Stores, DbErr> {
    let connections = DatabaseConnections::init(config).await?;

    tracing::info!("Running database migrations...");
    Migrator::up(&connections.main, None).await?;

    Ok((
        Arc::new(PostgresListingRepository::new(connections.main.clone())),
        Arc::new(PostgresUserRepository::new(connections.main)),
    ))
}
