use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::resource::derive;

/// Listing entity - an item offered on the marketplace.
///
/// `id` and `created_at` are private: the first is assigned once by the
/// store, the second is fixed at construction. Everything else the write
/// projection may touch is reachable through setters or public fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    id: Option<Uuid>,
    pub title: Option<String>,
    description: Option<String>,
    /// Price in cents.
    pub price: Option<i64>,
    created_at: DateTime<Utc>,
    is_published: bool,
    pub owner: Option<Uuid>,
}

/// Stored state of a listing, used to rebuild one from persistence.
#[derive(Debug, Clone)]
pub struct ListingParts {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub created_at: DateTime<Utc>,
    pub is_published: bool,
    pub owner: Uuid,
}

impl Listing {
    /// Create a new, unsaved and unpublished listing.
    pub fn new(title: Option<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: None,
            title,
            description: None,
            price: None,
            created_at,
            is_published: false,
            owner: None,
        }
    }

    /// Rebuild a persisted listing. The description is taken as already normalized.
    pub fn hydrate(parts: ListingParts) -> Self {
        Self {
            id: Some(parts.id),
            title: Some(parts.title),
            description: parts.description,
            price: Some(parts.price),
            created_at: parts.created_at,
            is_published: parts.is_published,
            owner: Some(parts.owner),
        }
    }

    pub fn id(&self) -> Option<Uuid> {
        self.id
    }

    /// Assign the store-generated id. Returns `false` if an id was already set.
    pub fn assign_id(&mut self, id: Uuid) -> bool {
        if self.id.is_some() {
            return false;
        }
        self.id = Some(id);
        true
    }

    /// Stored (normalized) description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Set the description from raw user text, normalizing line breaks.
    pub fn set_text_description(&mut self, raw: &str) {
        self.description = Some(derive::normalize_description(raw));
    }

    pub fn clear_description(&mut self) {
        self.description = None;
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn set_published(&mut self, is_published: bool) {
        self.is_published = is_published;
    }

    pub fn short_description(&self) -> Option<String> {
        self.description.as_deref().map(derive::short_description)
    }

    pub fn created_at_ago(&self, now: DateTime<Utc>) -> String {
        derive::created_at_ago(self.created_at, now)
    }

    /// Convert into stored state. `None` while a required field is missing.
    pub fn into_parts(self) -> Option<ListingParts> {
        Some(ListingParts {
            id: self.id?,
            title: self.title?,
            description: self.description,
            price: self.price?,
            created_at: self.created_at,
            is_published: self.is_published,
            owner: self.owner?,
        })
    }
}
