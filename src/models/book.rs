use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookMetadata};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub published_year: Option<i32>,
    pub metadata: String, // JSON object, see BookMetadata
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::collection_book::Entity")]
    CollectionBook,
}

impl Related<super::collection_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CollectionBook.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Book {
    fn from(model: Model) -> Self {
        let metadata: BookMetadata = match serde_json::from_str(&model.metadata) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!("Unreadable metadata for book {}: {}", model.isbn, e);
                BookMetadata::default()
            }
        };

        Self {
            isbn: model.isbn,
            title: model.title,
            author: model.author,
            description: model.description,
            published_year: model.published_year,
            metadata,
            collections: None,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}

/// Serialize metadata for the `metadata` column
pub fn encode_metadata(metadata: &BookMetadata) -> String {
    serde_json::to_string(metadata).unwrap_or_else(|_| r#"{"genres":[]}"#.to_string())
}
