//! Domain entities - the core business objects.

mod listing;
mod user;

pub use listing::{Listing, ListingParts};
pub use user::{User, USER_IRI_PREFIX};
