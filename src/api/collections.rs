use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use super::error::{bad_body, ensure_valid, parse_collection_id};
use crate::domain::{
    Collection, CollectionInput, DomainError, EntityKind, validate_collection,
};
use crate::infrastructure::AppState;
use crate::services::{self, ReconcileOutcome};

#[derive(Debug, Serialize, Deserialize)]
pub struct AddBooksRequest {
    pub books_to_add: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveBooksRequest {
    pub books_to_remove: Vec<String>,
}

pub async fn list_collections(
    State(state): State<AppState>,
) -> Result<Json<Vec<Collection>>, DomainError> {
    let collections = state.collection_repo.find_all().await?;
    Ok(Json(collections))
}

pub async fn create_collection(
    State(state): State<AppState>,
    payload: Result<Json<CollectionInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Collection>), DomainError> {
    let Json(input) = payload.map_err(bad_body)?;
    ensure_valid(validate_collection(&input))?;

    let collection = state.collection_repo.create(input).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

pub async fn get_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Collection>, DomainError> {
    let id = parse_collection_id(&id)?;

    let mut collection = state
        .collection_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Collection, id))?;

    collection.books = Some(state.collection_repo.get_books(id).await?);
    Ok(Json(collection))
}

pub async fn update_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CollectionInput>, JsonRejection>,
) -> Result<Json<Collection>, DomainError> {
    let id = parse_collection_id(&id)?;
    let Json(input) = payload.map_err(bad_body)?;
    ensure_valid(validate_collection(&input))?;

    let collection = state.collection_repo.update(id, input).await?;
    Ok(Json(collection))
}

pub async fn delete_collection(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, DomainError> {
    let id = parse_collection_id(&id)?;
    state.collection_repo.soft_delete(id).await?;
    Ok(StatusCode::OK)
}

/// Add a batch of books to a collection
pub async fn add_books(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AddBooksRequest>, JsonRejection>,
) -> Result<Json<ReconcileOutcome>, DomainError> {
    let id = parse_collection_id(&id)?;
    let Json(request) = payload.map_err(bad_body)?;

    let outcome = services::add_books(
        state.book_repo.as_ref(),
        state.collection_repo.as_ref(),
        id,
        &request.books_to_add,
    )
    .await?;
    Ok(Json(outcome))
}

/// Remove a batch of books from a collection
pub async fn remove_books(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RemoveBooksRequest>, JsonRejection>,
) -> Result<Json<ReconcileOutcome>, DomainError> {
    let id = parse_collection_id(&id)?;
    let Json(request) = payload.map_err(bad_body)?;

    let outcome = services::remove_books(
        state.book_repo.as_ref(),
        state.collection_repo.as_ref(),
        id,
        &request.books_to_remove,
    )
    .await?;
    Ok(Json(outcome))
}
