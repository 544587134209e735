//! Validation selector: per-scope constraint tables and one evaluator.

use serde::{Deserialize, Serialize};

use super::table::WriteScope;
use crate::domain::{Listing, User};

pub const NOT_BLANK_MESSAGE: &str = "This value should not be blank.";
pub const TITLE_TOO_SHORT_MESSAGE: &str = "Minimum 5 chars.";
pub const TITLE_TOO_LONG_MESSAGE: &str =
    "This value is too long. It should have 30 characters or less.";
pub const UNRESOLVED_OWNER_MESSAGE: &str = "This value should reference an existing user.";

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub property_path: String,
    pub message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Property {
    Title,
    Price,
    Owner,
}

impl Property {
    pub fn wire_name(self) -> &'static str {
        match self {
            Property::Title => "title",
            Property::Price => "price",
            Property::Owner => "owner",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not the empty string.
    NotBlank,
    /// Character count within `min..=max`. Missing or empty values are skipped.
    Length {
        min: usize,
        max: usize,
        min_message: &'static str,
        max_message: &'static str,
    },
    /// The referenced user exists. A missing reference is skipped.
    ExistingUser,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraint {
    pub property: Property,
    pub rule: Rule,
}

const fn constraint(property: Property, rule: Rule) -> Constraint {
    Constraint { property, rule }
}

const TITLE_LENGTH: Rule = Rule::Length {
    min: 5,
    max: 30,
    min_message: TITLE_TOO_SHORT_MESSAGE,
    max_message: TITLE_TOO_LONG_MESSAGE,
};

const CREATE_CONSTRAINTS: &[Constraint] = &[
    constraint(Property::Title, Rule::NotBlank),
    constraint(Property::Title, TITLE_LENGTH),
    constraint(Property::Price, Rule::NotBlank),
    constraint(Property::Owner, Rule::NotBlank),
    constraint(Property::Owner, Rule::ExistingUser),
];

// No title length here: an existing title may be edited below the creation minimum.
const UPDATE_CONSTRAINTS: &[Constraint] = &[
    constraint(Property::Title, Rule::NotBlank),
    constraint(Property::Price, Rule::NotBlank),
    constraint(Property::Owner, Rule::NotBlank),
    constraint(Property::Owner, Rule::ExistingUser),
];

const PUBLISH_CONSTRAINTS: &[Constraint] = &[];

pub fn constraints_for(scope: WriteScope) -> &'static [Constraint] {
    match scope {
        WriteScope::Create => CREATE_CONSTRAINTS,
        WriteScope::Update => UPDATE_CONSTRAINTS,
        WriteScope::Publish => PUBLISH_CONSTRAINTS,
    }
}

/// Evaluate every constraint of `scope` against `listing`.
///
/// `owner` is the user the listing's owner reference resolved to, if any.
/// An empty result means the write may proceed.
pub fn validate(listing: &Listing, scope: WriteScope, owner: Option<&User>) -> Vec<Violation> {
    constraints_for(scope)
        .iter()
        .filter_map(|c| check(listing, c, owner).map(|m| Violation::new(c.property.wire_name(), m)))
        .collect()
}

fn check(listing: &Listing, constraint: &Constraint, owner: Option<&User>) -> Option<&'static str> {
    match (constraint.property, constraint.rule) {
        (property, Rule::NotBlank) => is_blank(listing, property).then_some(NOT_BLANK_MESSAGE),
        (Property::Title, Rule::Length { min, max, min_message, max_message }) => {
            let len = listing
                .title
                .as_deref()
                .filter(|t| !t.is_empty())?
                .chars()
                .count();
            if len < min {
                Some(min_message)
            } else if len > max {
                Some(max_message)
            } else {
                None
            }
        }
        (Property::Owner, Rule::ExistingUser) => {
            let reference = listing.owner?;
            let resolved = owner.is_some_and(|user| user.id == reference);
            (!resolved).then_some(UNRESOLVED_OWNER_MESSAGE)
        }
        // Rules that do not apply to the property never fire.
        _ => None,
    }
}

fn is_blank(listing: &Listing, property: Property) -> bool {
    match property {
        Property::Title => listing.title.as_deref().is_none_or(str::is_empty),
        Property::Price => listing.price.is_none(),
        Property::Owner => listing.owner.is_none(),
    }
}
