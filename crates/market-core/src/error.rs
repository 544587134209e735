//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

use crate::resource::Violation;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: &'static str, id: Uuid },

    #[error("Validation failed with {} violation(s)", .0.len())]
    Validation(Vec<Violation>),

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] ProjectionError),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<RepoError> for DomainError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::Constraint(msg) => DomainError::Duplicate(msg),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Failures while mapping a wire object onto a listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProjectionError {
    #[error("Unknown field \"{field}\"")]
    UnknownField { field: String },

    #[error("Field \"{field}\" expects {expected}")]
    InvalidValue {
        field: &'static str,
        expected: &'static str,
    },
}
