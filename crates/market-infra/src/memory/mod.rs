//! In-memory repositories - used when no database is configured.

mod listing;
mod user;

pub use listing::InMemoryListingRepository;
pub use user::InMemoryUserRepository;
