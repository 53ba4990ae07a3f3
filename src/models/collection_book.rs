use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Membership;

/// Membership row. The (book_isbn, collection_id) pair is unique among rows
/// with `deleted_at IS NULL`; removed memberships stay behind as history.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collection_books")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub book_isbn: String,
    pub collection_id: i32,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::collection::Entity",
        from = "Column::CollectionId",
        to = "super::collection::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Collection,
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookIsbn",
        to = "super::book::Column::Isbn",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Book,
}

impl Related<super::collection::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Collection.def()
    }
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Membership {
    fn from(model: Model) -> Self {
        Self {
            book_isbn: model.book_isbn,
            collection_id: model.collection_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        }
    }
}
