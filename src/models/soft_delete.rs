//! Soft-deletion predicates shared by every catalog table
//!
//! Rows are never physically removed. "Current" reads go through
//! `find_active`, and deletions through `soft_delete_where`, so the
//! `deleted_at IS NULL` predicate lives in exactly one place.

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Select, UpdateMany};

use super::{book, collection, collection_book};

pub trait SoftDelete: EntityTrait {
    fn deleted_at() -> Self::Column;
    fn updated_at() -> Self::Column;

    /// Rows that are still active
    fn find_active() -> Select<Self> {
        Self::find().filter(Self::deleted_at().is_null())
    }

    /// Stamp `deleted_at` on active rows matching `filter`
    fn soft_delete_where<F>(filter: F, now: &str) -> UpdateMany<Self>
    where
        F: sea_orm::sea_query::IntoCondition,
    {
        Self::update_many()
            .col_expr(Self::deleted_at(), Expr::value(now.to_string()))
            .col_expr(Self::updated_at(), Expr::value(now.to_string()))
            .filter(filter)
            .filter(Self::deleted_at().is_null())
    }
}

impl SoftDelete for book::Entity {
    fn deleted_at() -> Self::Column {
        book::Column::DeletedAt
    }

    fn updated_at() -> Self::Column {
        book::Column::UpdatedAt
    }
}

impl SoftDelete for collection::Entity {
    fn deleted_at() -> Self::Column {
        collection::Column::DeletedAt
    }

    fn updated_at() -> Self::Column {
        collection::Column::UpdatedAt
    }
}

impl SoftDelete for collection_book::Entity {
    fn deleted_at() -> Self::Column {
        collection_book::Column::DeletedAt
    }

    fn updated_at() -> Self::Column {
        collection_book::Column::UpdatedAt
    }
}
