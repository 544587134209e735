//! Resource exposure layer for listings.
//!
//! Decides, per operation, which fields are visible, which are writable,
//! which constraints apply, and how derived fields are computed.

pub mod derive;
mod filter;
mod projector;
mod table;
mod validation;

pub use filter::{CollectionQuery, ListingFilter, PriceRange};
pub use projector::{ApplyOutcome, FieldProjector, Representation, UnknownFieldPolicy};
pub use table::{Field, ReadField, ReadScope, WriteField, WriteScope, WriteTarget, read_fields, write_fields};
pub use validation::{
    Constraint, NOT_BLANK_MESSAGE, Property, Rule, TITLE_TOO_LONG_MESSAGE,
    TITLE_TOO_SHORT_MESSAGE, UNRESOLVED_OWNER_MESSAGE, Violation, constraints_for, validate,
};
