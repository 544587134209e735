//! Collection query: filters, page number and property selection.
//!
//! Query keys follow the bracket convention, e.g.
//! `?isPublished=true&title=brie&price[between]=500..1500&properties[]=title&page=2`.

use crate::domain::Listing;
use crate::error::DomainError;

/// Bounds on the price, all inclusive except `gt`/`lt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceRange {
    pub gt: Option<i64>,
    pub gte: Option<i64>,
    pub lt: Option<i64>,
    pub lte: Option<i64>,
}

impl PriceRange {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn contains(&self, price: i64) -> bool {
        self.gt.is_none_or(|b| price > b)
            && self.gte.is_none_or(|b| price >= b)
            && self.lt.is_none_or(|b| price < b)
            && self.lte.is_none_or(|b| price <= b)
    }
}

/// Storage-level filter for the listing collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    pub is_published: Option<bool>,
    /// Substring match on the title.
    pub title: Option<String>,
    /// Substring match on the stored description.
    pub description: Option<String>,
    pub price: PriceRange,
}

impl ListingFilter {
    /// In-process evaluation, equivalent to what a SQL store does with the same filter.
    pub fn matches(&self, listing: &Listing) -> bool {
        self.is_published
            .is_none_or(|flag| listing.is_published() == flag)
            && contains(listing.title.as_deref(), self.title.as_deref())
            && contains(listing.description(), self.description.as_deref())
            && (self.price.is_empty() || listing.price.is_some_and(|p| self.price.contains(p)))
    }
}

fn contains(haystack: Option<&str>, needle: Option<&str>) -> bool {
    match needle {
        None => true,
        Some(needle) => haystack.is_some_and(|h| h.contains(needle)),
    }
}

/// A parsed `GET /listings` query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionQuery {
    pub filter: ListingFilter,
    /// 1-based page number.
    pub page: u64,
    /// Wire names to keep in each item; `None` keeps the whole read projection.
    pub properties: Option<Vec<String>>,
}

impl Default for CollectionQuery {
    fn default() -> Self {
        Self {
            filter: ListingFilter::default(),
            page: 1,
            properties: None,
        }
    }
}

impl CollectionQuery {
    /// Build a query from decoded key/value pairs.
    ///
    /// Unknown keys and unparseable filter values are ignored; only an
    /// invalid page number is an error. The last occurrence of a filter wins.
    pub fn from_pairs(pairs: &[(String, String)]) -> Result<Self, DomainError> {
        let mut query = Self::default();

        for (key, value) in pairs {
            match key.as_str() {
                "page" => {
                    query.page = value
                        .parse::<u64>()
                        .ok()
                        .filter(|p| *p >= 1)
                        .ok_or_else(|| {
                            DomainError::InvalidQuery("page must be an integer of at least 1".to_string())
                        })?;
                }
                "isPublished" => {
                    if let Some(flag) = parse_bool(value) {
                        query.filter.is_published = Some(flag);
                    }
                }
                "title" => query.filter.title = Some(value.clone()),
                "description" => query.filter.description = Some(value.clone()),
                "price[gt]" => set_bound(&mut query.filter.price.gt, value),
                "price[gte]" => set_bound(&mut query.filter.price.gte, value),
                "price[lt]" => set_bound(&mut query.filter.price.lt, value),
                "price[lte]" => set_bound(&mut query.filter.price.lte, value),
                "price[between]" => {
                    if let Some((low, high)) = value.split_once("..") {
                        if let (Ok(low), Ok(high)) = (low.trim().parse::<i64>(), high.trim().parse::<i64>()) {
                            query.filter.price.gte = Some(low);
                            query.filter.price.lte = Some(high);
                        }
                    }
                }
                "properties[]" | "properties" => query
                    .properties
                    .get_or_insert_with(Vec::new)
                    .extend(value.split(',').map(|p| p.trim().to_string())),
                _ => {}
            }
        }

        Ok(query)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn set_bound(slot: &mut Option<i64>, value: &str) {
    if let Ok(bound) = value.trim().parse() {
        *slot = Some(bound);
    }
}
