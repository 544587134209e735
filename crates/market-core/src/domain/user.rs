use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Path prefix under which users are addressed on the wire.
pub const USER_IRI_PREFIX: &str = "/api/users/";

/// User entity - the owner side of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a generated ID.
    pub fn new(email: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            created_at,
        }
    }

    /// IRI of a user, e.g. `/api/users/9f0c...`.
    pub fn iri(id: Uuid) -> String {
        format!("{USER_IRI_PREFIX}{id}")
    }

    /// Parse an owner reference given either as an IRI or as a bare UUID.
    pub fn parse_reference(reference: &str) -> Option<Uuid> {
        let raw = reference
            .strip_prefix(USER_IRI_PREFIX)
            .unwrap_or(reference)
            .trim_end_matches('/');
        Uuid::parse_str(raw).ok()
    }
}
