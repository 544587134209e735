//! Application services - orchestrate ports around the resource layer.

mod listings;

pub use listings::{DEFAULT_PAGE_SIZE, ListingPage, ListingService};
