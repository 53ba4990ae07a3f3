//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, CollectionRepository};
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmCollectionRepository};

/// Application state shared across all handlers
///
/// The only shared resource is the connection pool behind the repositories.
#[derive(Clone)]
pub struct AppState {
    /// Book repository
    pub book_repo: Arc<dyn BookRepository>,
    /// Collection repository (memberships included)
    pub collection_repo: Arc<dyn CollectionRepository>,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection) -> Self {
        let book_repo = Arc::new(SeaOrmBookRepository::new(db.clone()));
        let collection_repo = Arc::new(SeaOrmCollectionRepository::new(db));

        Self {
            book_repo,
            collection_repo,
        }
    }
}
