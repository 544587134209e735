//! Request-pipeline helpers shared by all handlers.

pub mod error;
