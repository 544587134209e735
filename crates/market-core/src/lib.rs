//! # Market Core
//!
//! The domain layer of the listing marketplace.
//! This crate contains pure business logic with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod resource;
pub mod service;

pub use error::DomainError;
