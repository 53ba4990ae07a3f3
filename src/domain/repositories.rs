//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.
//!
//! Every "find" operation returns active rows only: soft-deleted books,
//! collections and memberships are invisible unless a method says otherwise.

use async_trait::async_trait;

use super::DomainError;
use super::entities::{
    Book, BookFilter, BookInput, Collection, CollectionInput, Membership,
};

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Find all active books matching the filter
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError>;

    /// Find an active book by ISBN
    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError>;

    /// Insert a new book; `created_at` is set here and never again
    async fn create(&self, input: BookInput) -> Result<Book, DomainError>;

    /// Replace the editable fields of an active book
    async fn update(&self, isbn: &str, input: BookInput) -> Result<Book, DomainError>;

    /// Mark an active book deleted
    async fn soft_delete(&self, isbn: &str) -> Result<(), DomainError>;

    /// Active collections holding an active membership for this book
    async fn get_collections(&self, isbn: &str) -> Result<Vec<Collection>, DomainError>;
}

/// Repository trait for Collection entity and its memberships
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    /// Find all active collections with their member counts
    async fn find_all(&self) -> Result<Vec<Collection>, DomainError>;

    /// Find an active collection by ID, with its member count
    async fn find_by_id(&self, id: i32) -> Result<Option<Collection>, DomainError>;

    /// Insert a new collection; the store assigns the ID
    async fn create(&self, input: CollectionInput) -> Result<Collection, DomainError>;

    /// Replace the editable fields of an active collection
    async fn update(&self, id: i32, input: CollectionInput) -> Result<Collection, DomainError>;

    /// Mark an active collection deleted
    async fn soft_delete(&self, id: i32) -> Result<(), DomainError>;

    /// Active books holding an active membership in this collection
    async fn get_books(&self, id: i32) -> Result<Vec<Book>, DomainError>;

    /// Every membership row of the collection, soft-deleted ones included
    async fn membership_history(&self, id: i32) -> Result<Vec<Membership>, DomainError>;

    /// Link a book to a collection. A no-op when the pair is already active.
    async fn add_book(&self, collection_id: i32, isbn: &str) -> Result<(), DomainError>;

    /// Soft-delete the active membership of the pair. A no-op when absent.
    async fn remove_book(&self, collection_id: i32, isbn: &str) -> Result<(), DomainError>;
}
