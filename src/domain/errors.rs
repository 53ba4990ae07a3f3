//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! The API layer maps each kind onto an HTTP status; the CLI maps the wire
//! form (`ErrorBody`) back into per-field problem lines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::FieldError;

/// Kind of entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Book,
    Collection,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Book => "book",
            EntityKind::Collection => "collection",
        }
    }

    /// Field name used in error bodies when the lookup key came from the client
    pub fn key_field(&self) -> &'static str {
        match self {
            EntityKind::Book => "isbn",
            EntityKind::Collection => "collection_id",
        }
    }
}

#[derive(Debug, Error)]
pub enum DomainError {
    /// One or more client-correctable field problems
    #[error("validation failed ({} problem(s))", .0.len())]
    Validation(Vec<FieldError>),

    /// Referenced entity is absent or soft-deleted
    #[error("{} {key} not found", .entity.as_str())]
    NotFound { entity: EntityKind, key: String },

    /// Malformed body or path parameter
    #[error("bad request: {message}")]
    BadRequest {
        message: String,
        field: Option<String>,
    },

    /// Persistence failure; the detail is for logs only
    #[error("storage error: {0}")]
    Storage(String),

    /// Storage failure after part of a batch had been written
    #[error("batch stopped after {applied} of {planned} change(s): {reason}")]
    PartialBatch {
        applied: usize,
        planned: usize,
        reason: String,
    },
}

impl DomainError {
    pub fn not_found(entity: EntityKind, key: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>, field: Option<&str>) -> Self {
        DomainError::BadRequest {
            message: message.into(),
            field: field.map(str::to_string),
        }
    }

    /// Storage-class failures hide their detail from clients
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            DomainError::Storage(_) | DomainError::PartialBatch { .. }
        )
    }

    /// Wire representation shared by the server and the client
    pub fn to_body(&self) -> ErrorBody {
        let errors = match self {
            DomainError::Validation(problems) => problems
                .iter()
                .map(|p| ErrorItem::with_field(&p.message, &p.field))
                .collect(),
            DomainError::NotFound { entity, key } => vec![ErrorItem::with_field(
                format!("{} {:?} not found", entity.as_str(), key),
                entity.key_field(),
            )],
            DomainError::BadRequest { message, field } => vec![ErrorItem {
                message: message.clone(),
                field: field.clone(),
            }],
            DomainError::Storage(_) => vec![ErrorItem::message("something went wrong")],
            DomainError::PartialBatch {
                applied, planned, ..
            } => vec![ErrorItem::message(format!(
                "something went wrong after {applied} of {planned} change(s) were applied; retrying is safe"
            ))],
        };
        ErrorBody { errors }
    }
}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(e.to_string())
    }
}

/// `{"errors": [{"message": ..., "field": ...}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorItem {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn with_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_detail_is_not_exposed() {
        let err = DomainError::Storage("UNIQUE constraint failed: books.isbn".to_string());
        let body = err.to_body();
        assert_eq!(body.errors, vec![ErrorItem::message("something went wrong")]);
        assert!(err.is_storage());
    }

    #[test]
    fn not_found_names_the_key() {
        let body = DomainError::not_found(EntityKind::Book, "B").to_body();
        assert_eq!(body.errors.len(), 1);
        assert!(body.errors[0].message.contains("\"B\""));
        assert_eq!(body.errors[0].field.as_deref(), Some("isbn"));
    }

    #[test]
    fn field_is_omitted_when_absent() {
        let json = serde_json::to_value(ErrorItem::message("oops")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "oops" }));
    }
}
