//! Domain layer - Pure business abstractions
//!
//! This layer contains NO web framework dependencies (no Axum).
//! Entity types, validation, repository traits and domain error types.

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod validation;

pub use entities::*;
pub use errors::{DomainError, EntityKind, ErrorBody, ErrorItem};
pub use repositories::*;
pub use validation::{FieldError, validate_book, validate_collection};
