use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Collection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: String,
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

impl Model {
    pub fn into_domain(self, total_books: u64) -> Collection {
        Collection {
            id: self.id,
            name: self.name,
            description: self.description,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            total_books,
            books: None,
        }
    }
}
