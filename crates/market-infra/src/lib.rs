//! # Market Infrastructure
//!
//! Concrete implementations of the ports defined in `market-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL storage via SeaORM
//! - `minimal` - No external dependencies, in-memory only

pub mod clock;
pub mod database;
pub mod memory;

pub use clock::SystemClock;
pub use database::{DatabaseConfig, DatabaseConnections};
pub use memory::{InMemoryListingRepository, InMemoryUserRepository};

#[cfg(feature = "postgres")]
pub use database::{PostgresListingRepository, PostgresUserRepository};
