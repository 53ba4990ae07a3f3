//! Required-field checks run before an entity is persisted

use serde::{Deserialize, Serialize};

use super::entities::{BookInput, CollectionInput};

/// A problem with a single input field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn required(field: &str) -> Self {
        Self {
            field: field.to_string(),
            message: "required".to_string(),
        }
    }
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::required(field));
    }
}

/// ISBN, title and author must be non-empty. Other fields are unconstrained.
pub fn validate_book(book: &BookInput) -> Vec<FieldError> {
    let mut errors = Vec::new();
    require(&mut errors, "isbn", &book.isbn);
    require(&mut errors, "title", &book.title);
    require(&mut errors, "author", &book.author);
    errors
}

/// Collections have no required fields yet.
pub fn validate_collection(_collection: &CollectionInput) -> Vec<FieldError> {
    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BookMetadata;

    fn complete_book() -> BookInput {
        BookInput {
            isbn: "A".to_string(),
            title: "T".to_string(),
            author: "Au".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn complete_book_has_no_errors() {
        assert!(validate_book(&complete_book()).is_empty());
    }

    #[test]
    fn optional_fields_do_not_matter() {
        let book = BookInput {
            description: String::new(),
            published_year: Some(-40),
            metadata: BookMetadata {
                genres: vec![String::new()],
            },
            ..complete_book()
        };
        assert!(validate_book(&book).is_empty());
    }

    #[test]
    fn one_error_per_missing_field() {
        let errors = validate_book(&BookInput::default());
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["isbn", "title", "author"]);
        assert!(errors.iter().all(|e| e.message == "required"));
    }

    #[test]
    fn empty_isbn_only() {
        let book = BookInput {
            isbn: String::new(),
            ..complete_book()
        };
        assert_eq!(validate_book(&book), vec![FieldError::required("isbn")]);
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let book = BookInput {
            author: "   ".to_string(),
            ..complete_book()
        };
        assert_eq!(validate_book(&book), vec![FieldError::required("author")]);
    }

    #[test]
    fn collections_are_permissive() {
        assert!(validate_collection(&CollectionInput::default()).is_empty());
    }
}
