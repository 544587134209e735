//! Field projector: listing <-> wire object, driven by the tables in [`super::table`].

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use super::table::{self, Field, ReadScope, WriteField, WriteScope, WriteTarget};
use crate::domain::{Listing, User};
use crate::error::ProjectionError;

/// A projected wire object. Keys keep projection order.
pub type Representation = Map<String, Value>;

/// What to do with wire keys outside the write projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    /// Drop them and report them in [`ApplyOutcome::ignored`].
    #[default]
    Ignore,
    /// Fail with [`ProjectionError::UnknownField`].
    Reject,
}

/// Result of a successful [`FieldProjector::apply`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApplyOutcome {
    /// Wire keys that were dropped under [`UnknownFieldPolicy::Ignore`].
    pub ignored: Vec<String>,
}

/// A decoded write, staged before it touches the listing.
enum Change {
    Title(Option<String>),
    Description(Option<String>),
    Price(Option<i64>),
    Owner(Option<uuid::Uuid>),
    Published(bool),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldProjector {
    unknown_fields: UnknownFieldPolicy,
}

impl FieldProjector {
    pub fn new(unknown_fields: UnknownFieldPolicy) -> Self {
        Self { unknown_fields }
    }

    pub fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }

    /// Wire names of the read projection, optionally narrowed to `properties`.
    pub fn columns(&self, scope: ReadScope, properties: Option<&[String]>) -> Vec<&'static str> {
        table::read_fields(scope)
            .filter(|f| selected(f.name, properties))
            .map(|f| f.name)
            .collect()
    }

    /// Serialize `listing` for `scope`. Derived fields are computed against `now`.
    pub fn project(&self, listing: &Listing, scope: ReadScope, now: DateTime<Utc>) -> Representation {
        self.project_only(listing, scope, now, None)
    }

    /// Like [`Self::project`], keeping only the wire names in `properties` when given.
    /// Names outside the projection are ignored.
    pub fn project_only(
        &self,
        listing: &Listing,
        scope: ReadScope,
        now: DateTime<Utc>,
        properties: Option<&[String]>,
    ) -> Representation {
        table::read_fields(scope)
            .filter(|f| selected(f.name, properties))
            .map(|f| (f.name.to_string(), read_value(listing, f.field, now)))
            .collect()
    }

    /// Apply a wire object to `listing` for `scope`.
    ///
    /// Every value is decoded before anything is written, so on error the
    /// listing is left untouched. `id` and `created_at` are never reachable.
    pub fn apply(
        &self,
        wire: &Representation,
        scope: WriteScope,
        listing: &mut Listing,
    ) -> Result<ApplyOutcome, ProjectionError> {
        let accepted = table::write_fields(scope);
        let mut changes = Vec::with_capacity(wire.len());
        let mut outcome = ApplyOutcome::default();

        for (key, value) in wire {
            match accepted.iter().find(|f| f.name == key) {
                Some(field) => changes.push(decode(field, value)?),
                None => match self.unknown_fields {
                    UnknownFieldPolicy::Ignore => outcome.ignored.push(key.clone()),
                    UnknownFieldPolicy::Reject => {
                        return Err(ProjectionError::UnknownField { field: key.clone() });
                    }
                },
            }
        }

        for change in changes {
            match change {
                Change::Title(title) => listing.title = title,
                Change::Description(Some(raw)) => listing.set_text_description(&raw),
                Change::Description(None) => listing.clear_description(),
                Change::Price(price) => listing.price = price,
                Change::Owner(owner) => listing.owner = owner,
                Change::Published(flag) => listing.set_published(flag),
            }
        }

        Ok(outcome)
    }
}

fn selected(name: &str, properties: Option<&[String]>) -> bool {
    properties.is_none_or(|props| props.iter().any(|p| p == name))
}

fn read_value(listing: &Listing, field: Field, now: DateTime<Utc>) -> Value {
    match field {
        Field::Id => listing.id().map(|id| Value::String(id.to_string())).into(),
        Field::Title => listing.title.clone().into(),
        Field::Description => listing.description().into(),
        Field::ShortDescription => listing.short_description().into(),
        Field::Price => listing.price.into(),
        Field::CreatedAtAgo => listing.created_at_ago(now).into(),
        Field::IsPublished => listing.is_published().into(),
        Field::Owner => listing.owner.map(User::iri).into(),
    }
}

fn decode(field: &WriteField, value: &Value) -> Result<Change, ProjectionError> {
    let invalid = |expected| ProjectionError::InvalidValue {
        field: field.name,
        expected,
    };

    let change = match field.target {
        WriteTarget::Title => Change::Title(nullable_string(value).ok_or(invalid("a string"))?),
        WriteTarget::TextDescription => {
            Change::Description(nullable_string(value).ok_or(invalid("a string"))?)
        }
        WriteTarget::Price => match value {
            Value::Null => Change::Price(None),
            v => Change::Price(Some(v.as_i64().ok_or(invalid("an integer amount in cents"))?)),
        },
        WriteTarget::Owner => match value {
            Value::Null => Change::Owner(None),
            Value::String(reference) => Change::Owner(Some(
                User::parse_reference(reference).ok_or(invalid("a user IRI"))?,
            )),
            _ => return Err(invalid("a user IRI")),
        },
        WriteTarget::IsPublished => {
            Change::Published(value.as_bool().ok_or(invalid("a boolean"))?)
        }
    };

    Ok(change)
}

fn nullable_string(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(s) => Some(Some(s.clone())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;
    use uuid::Uuid;

    fn wire(value: Value) -> Representation {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    fn listing(now: DateTime<Utc>) -> Listing {
        let mut listing = Listing::new(Some("Brie Lovers".to_string()), now);
        listing.price = Some(1000);
        listing.owner = Some(Uuid::new_v4());
        listing
    }

    #[test]
    fn test_project_collection() {
        let now = Utc::now();
        let mut listing = listing(now - Duration::hours(3));
        listing.set_text_description("Creamy\nand mild");
        let owner = listing.owner.unwrap();

        let out = FieldProjector::default().project(&listing, ReadScope::Collection, now);

        assert_eq!(
            Value::Object(out),
            json!({
                "title": "Brie Lovers",
                "description": "Creamy<br />and mild",
                "shortDescription": "Creamy<br ...",
                "price": 1000,
                "createdAtAgo": "3 hours ago",
                "isPublished": false,
                "owner": format!("/api/users/{owner}"),
            })
        );
    }

    #[test]
    fn test_project_keeps_table_order() {
        let now = Utc::now();
        let out = FieldProjector::default().project(&listing(now), ReadScope::Item, now);
        let keys: Vec<_> = out.keys().map(String::as_str).collect();
        assert_eq!(keys, FieldProjector::default().columns(ReadScope::Item, None));
    }

    #[test]
    fn test_project_item_includes_id() {
        let now = Utc::now();
        let mut listing = listing(now);
        let id = Uuid::new_v4();
        listing.assign_id(id);

        let projector = FieldProjector::default();
        let item = projector.project(&listing, ReadScope::Item, now);
        let collection = projector.project(&listing, ReadScope::Collection, now);

        assert_eq!(item["id"], json!(id.to_string()));
        assert!(!collection.contains_key("id"));
        assert!(!item.contains_key("createdAt"));
    }

    #[test]
    fn test_project_without_description() {
        let now = Utc::now();
        let out = FieldProjector::default().project(&listing(now), ReadScope::Item, now);
        assert_eq!(out["description"], Value::Null);
        assert_eq!(out["shortDescription"], Value::Null);
        assert_eq!(out["createdAtAgo"], json!("a few seconds ago"));
    }

    #[test]
    fn test_project_only_selected_properties() {
        let now = Utc::now();
        let props = vec!["title".to_string(), "price".to_string(), "bogus".to_string()];
        let out = FieldProjector::default().project_only(
            &listing(now),
            ReadScope::Collection,
            now,
            Some(&props),
        );
        assert_eq!(Value::Object(out), json!({"title": "Brie Lovers", "price": 1000}));
    }

    #[test]
    fn test_apply_general_write() {
        let now = Utc::now();
        let mut listing = Listing::new(None, now);
        let owner = Uuid::new_v4();
        let payload = wire(json!({
            "title": "Aged Gouda",
            "description": "Nutty\nand sweet",
            "price": 2500,
            "owner": format!("/api/users/{owner}"),
        }));

        let outcome = FieldProjector::default()
            .apply(&payload, WriteScope::Create, &mut listing)
            .unwrap();

        assert!(outcome.ignored.is_empty());
        assert_eq!(listing.title.as_deref(), Some("Aged Gouda"));
        assert_eq!(listing.description(), Some("Nutty<br />and sweet"));
        assert_eq!(listing.price, Some(2500));
        assert_eq!(listing.owner, Some(owner));
    }

    #[test]
    fn test_apply_ignores_is_published_on_general_write() {
        let now = Utc::now();
        let mut listing = listing(now);
        let payload = wire(json!({"title": "Renamed", "isPublished": true}));

        let outcome = FieldProjector::default()
            .apply(&payload, WriteScope::Update, &mut listing)
            .unwrap();

        assert_eq!(listing.title.as_deref(), Some("Renamed"));
        assert!(!listing.is_published());
        assert_eq!(outcome.ignored, vec!["isPublished".to_string()]);
    }

    #[test]
    fn test_apply_never_touches_id_or_created_at() {
        let created_at = Utc::now() - Duration::days(2);
        let mut listing = listing(created_at);
        let id = Uuid::new_v4();
        listing.assign_id(id);
        let payload = wire(json!({
            "id": Uuid::new_v4().to_string(),
            "createdAt": "2001-01-01T00:00:00Z",
            "title": "Still mine",
        }));

        FieldProjector::default()
            .apply(&payload, WriteScope::Update, &mut listing)
            .unwrap();

        assert_eq!(listing.id(), Some(id));
        assert_eq!(listing.created_at(), created_at);
    }

    #[test]
    fn test_apply_reject_policy() {
        let now = Utc::now();
        let mut listing = listing(now);
        let before = listing.clone();
        let payload = wire(json!({"title": "Renamed", "shortDescription": "x"}));

        let err = FieldProjector::new(UnknownFieldPolicy::Reject)
            .apply(&payload, WriteScope::Update, &mut listing)
            .unwrap_err();

        assert_eq!(
            err,
            ProjectionError::UnknownField {
                field: "shortDescription".to_string()
            }
        );
        assert_eq!(listing, before);
    }

    #[test]
    fn test_apply_invalid_value_leaves_listing_untouched() {
        let now = Utc::now();
        let mut listing = listing(now);
        let before = listing.clone();
        let payload = wire(json!({"title": "Renamed", "price": "ten euros"}));

        let err = FieldProjector::default()
            .apply(&payload, WriteScope::Update, &mut listing)
            .unwrap_err();

        assert_eq!(
            err,
            ProjectionError::InvalidValue {
                field: "price",
                expected: "an integer amount in cents"
            }
        );
        assert_eq!(listing, before);
    }

    #[test]
    fn test_apply_rejects_malformed_owner() {
        let mut listing = Listing::new(None, Utc::now());
        let payload = wire(json!({"owner": "/api/users/not-a-uuid"}));

        let err = FieldProjector::default()
            .apply(&payload, WriteScope::Create, &mut listing)
            .unwrap_err();

        assert!(matches!(err, ProjectionError::InvalidValue { field: "owner", .. }));
    }

    #[test]
    fn test_apply_null_clears_value() {
        let now = Utc::now();
        let mut listing = listing(now);
        listing.set_text_description("gone soon");
        let payload = wire(json!({"price": null, "description": null}));

        FieldProjector::default()
            .apply(&payload, WriteScope::Update, &mut listing)
            .unwrap();

        assert_eq!(listing.price, None);
        assert_eq!(listing.description(), None);
    }

    #[test]
    fn test_apply_normalized_description_is_stable() {
        let mut listing = Listing::new(None, Utc::now());
        let projector = FieldProjector::default();

        projector
            .apply(&wire(json!({"description": "a\nb"})), WriteScope::Update, &mut listing)
            .unwrap();
        let stored = listing.description().unwrap().to_string();

        projector
            .apply(&wire(json!({"description": stored.clone()})), WriteScope::Update, &mut listing)
            .unwrap();
        assert_eq!(listing.description(), Some(stored.as_str()));
    }

    #[test]
    fn test_apply_publish_scope() {
        let now = Utc::now();
        let mut listing = listing(now);
        let payload = wire(json!({"isPublished": true, "title": "ignored"}));

        let outcome = FieldProjector::default()
            .apply(&payload, WriteScope::Publish, &mut listing)
            .unwrap();

        assert!(listing.is_published());
        assert_eq!(listing.title.as_deref(), Some("Brie Lovers"));
        assert_eq!(outcome.ignored, vec!["title".to_string()]);
    }
}
