use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::domain::{DomainError, FieldError};

impl IntoResponse for DomainError {
    fn into_response(self) -> Response {
        let status = match &self {
            DomainError::Validation(_) | DomainError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Storage(_) | DomainError::PartialBatch { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if self.is_storage() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }

        (status, Json(self.to_body())).into_response()
    }
}

/// Malformed JSON, wrong content type, or a body that does not fit the shape
pub fn bad_body(rejection: JsonRejection) -> DomainError {
    tracing::debug!("Unreadable request body: {}", rejection.body_text());
    DomainError::bad_request("could not read request", None)
}

pub fn bad_query(rejection: QueryRejection) -> DomainError {
    tracing::debug!("Unreadable query string: {}", rejection.body_text());
    DomainError::bad_request("could not read query", None)
}

/// Turn validation problems into an error, or pass
pub fn ensure_valid(problems: Vec<FieldError>) -> Result<(), DomainError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(DomainError::Validation(problems))
    }
}

pub fn parse_collection_id(raw: &str) -> Result<i32, DomainError> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::bad_request("bad value", Some("collection_id")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_id_must_be_an_integer() {
        assert_eq!(parse_collection_id("42").unwrap(), 42);
        assert!(matches!(
            parse_collection_id("forty-two"),
            Err(DomainError::BadRequest { .. })
        ));
    }

    #[test]
    fn status_codes() {
        let cases = [
            (DomainError::Validation(vec![]), StatusCode::BAD_REQUEST),
            (
                DomainError::bad_request("x", None),
                StatusCode::BAD_REQUEST,
            ),
            (
                DomainError::not_found(crate::domain::EntityKind::Book, "A"),
                StatusCode::NOT_FOUND,
            ),
            (
                DomainError::Storage("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                DomainError::PartialBatch {
                    applied: 1,
                    planned: 2,
                    reason: "boom".to_string(),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
