use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use super::error::{bad_body, bad_query, ensure_valid};
use crate::domain::{Book, BookFilter, BookInput, DomainError, EntityKind, validate_book};
use crate::infrastructure::AppState;

/// `GET /books` query string. Empty values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct BookQuery {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub published: Option<String>,
    /// Comma-separated
    pub genres: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<BookQuery> for BookFilter {
    type Error = DomainError;

    fn try_from(query: BookQuery) -> Result<Self, Self::Error> {
        let published_year = match non_empty(query.published) {
            Some(year) => Some(
                year.trim()
                    .parse()
                    .map_err(|_| DomainError::bad_request("bad value", Some("published")))?,
            ),
            None => None,
        };

        let genres = query
            .genres
            .map(|g| {
                g.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(BookFilter {
            isbn: non_empty(query.isbn),
            title: non_empty(query.title),
            author: non_empty(query.author),
            description: non_empty(query.description),
            published_year,
            genres,
        })
    }
}

pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> Result<Json<Vec<Book>>, DomainError> {
    let Query(query) = query.map_err(bad_query)?;
    let filter = BookFilter::try_from(query)?;

    let books = state.book_repo.find_all(filter).await?;
    Ok(Json(books))
}

pub async fn create_book(
    State(state): State<AppState>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Book>), DomainError> {
    let Json(input) = payload.map_err(bad_body)?;
    ensure_valid(validate_book(&input))?;

    let book = state.book_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<Json<Book>, DomainError> {
    let mut book = state
        .book_repo
        .find_by_isbn(&isbn)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Book, &isbn))?;

    book.collections = Some(state.book_repo.get_collections(&isbn).await?);
    Ok(Json(book))
}

pub async fn update_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
    payload: Result<Json<BookInput>, JsonRejection>,
) -> Result<Json<Book>, DomainError> {
    let Json(mut input) = payload.map_err(bad_body)?;
    // The path names the book; a body ISBN cannot rename it
    input.isbn = isbn.clone();
    ensure_valid(validate_book(&input))?;

    let book = state.book_repo.update(&isbn, input).await?;
    Ok(Json(book))
}

pub async fn delete_book(
    State(state): State<AppState>,
    Path(isbn): Path<String>,
) -> Result<StatusCode, DomainError> {
    state.book_repo.soft_delete(&isbn).await?;
    Ok(StatusCode::OK)
}
