//! SeaORM implementation of CollectionRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, SqlErr,
};

use crate::domain::{
    Book, Collection, CollectionInput, CollectionRepository, DomainError, EntityKind, Membership,
};
use crate::models::SoftDelete;
use crate::models::book::{self, Entity as BookEntity};
use crate::models::collection::{ActiveModel, Column, Entity as CollectionEntity};
use crate::models::collection_book::{
    self, ActiveModel as CollectionBookActiveModel, Entity as CollectionBookEntity,
};

/// SeaORM-based implementation of CollectionRepository
pub struct SeaOrmCollectionRepository {
    db: DatabaseConnection,
}

impl SeaOrmCollectionRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Active memberships of a collection whose book is also active
pub(crate) async fn count_members(
    db: &DatabaseConnection,
    collection_id: i32,
) -> Result<u64, DomainError> {
    let total = CollectionBookEntity::find_active()
        .join(JoinType::InnerJoin, collection_book::Relation::Book.def())
        .filter(collection_book::Column::CollectionId.eq(collection_id))
        .filter(book::Column::DeletedAt.is_null())
        .count(db)
        .await?;

    Ok(total)
}

fn check_keys(collection_id: i32, isbn: &str) -> Result<(), DomainError> {
    if isbn.trim().is_empty() {
        return Err(DomainError::bad_request("book isbn missing", Some("isbn")));
    }
    if collection_id <= 0 {
        return Err(DomainError::bad_request(
            "collection id missing",
            Some("collection_id"),
        ));
    }
    Ok(())
}

/// Insert an active membership row. A unique violation means another writer
/// linked the same pair first, which counts as success.
async fn insert_membership(
    db: &DatabaseConnection,
    collection_id: i32,
    isbn: &str,
) -> Result<(), DomainError> {
    let now = chrono::Utc::now().to_rfc3339();
    let new_entry = CollectionBookActiveModel {
        book_isbn: Set(isbn.to_string()),
        collection_id: Set(collection_id),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    };

    match new_entry.insert(db).await {
        Ok(_) => {
            tracing::debug!("Linked book {} to collection {}", isbn, collection_id);
            Ok(())
        }
        Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            tracing::debug!(
                "Book {} already linked to collection {}",
                isbn,
                collection_id
            );
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl CollectionRepository for SeaOrmCollectionRepository {
    async fn find_all(&self) -> Result<Vec<Collection>, DomainError> {
        let collections = CollectionEntity::find_active()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(collections.len());
        for col in collections {
            // Count total books in collection
            let total = count_members(&self.db, col.id).await?;
            result.push(col.into_domain(total));
        }

        Ok(result)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Collection>, DomainError> {
        let result = CollectionEntity::find_active()
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await?;

        match result {
            Some(col) => {
                let total = count_members(&self.db, col.id).await?;
                Ok(Some(col.into_domain(total)))
            }
            None => Ok(None),
        }
    }

    async fn create(&self, input: CollectionInput) -> Result<Collection, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let new_collection = ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = new_collection.insert(&self.db).await?;
        tracing::info!("Collection {} created", result.id);

        Ok(result.into_domain(0))
    }

    async fn update(&self, id: i32, input: CollectionInput) -> Result<Collection, DomainError> {
        let existing = CollectionEntity::find_active()
            .filter(Column::Id.eq(id))
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Collection, id))?;

        let mut active: ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let result = active.update(&self.db).await?;
        let total = count_members(&self.db, result.id).await?;
        tracing::info!("Collection {} updated", result.id);

        Ok(result.into_domain(total))
    }

    async fn soft_delete(&self, id: i32) -> Result<(), DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = CollectionEntity::soft_delete_where(Column::Id.eq(id), &now)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Collection, id));
        }

        tracing::info!("Collection {} soft-deleted", id);
        Ok(())
    }

    async fn get_books(&self, id: i32) -> Result<Vec<Book>, DomainError> {
        let books = BookEntity::find_active()
            .join(JoinType::InnerJoin, book::Relation::CollectionBook.def())
            .filter(collection_book::Column::CollectionId.eq(id))
            .filter(collection_book::Column::DeletedAt.is_null())
            .order_by_asc(collection_book::Column::Id)
            .all(&self.db)
            .await?;

        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn membership_history(&self, id: i32) -> Result<Vec<Membership>, DomainError> {
        let rows = CollectionBookEntity::find()
            .filter(collection_book::Column::CollectionId.eq(id))
            .order_by_asc(collection_book::Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().map(Membership::from).collect())
    }

    async fn add_book(&self, collection_id: i32, isbn: &str) -> Result<(), DomainError> {
        check_keys(collection_id, isbn)?;

        // Check if already exists
        let existing = CollectionBookEntity::find_active()
            .filter(collection_book::Column::CollectionId.eq(collection_id))
            .filter(collection_book::Column::BookIsbn.eq(isbn))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Ok(()); // Already exists, idempotent
        }

        insert_membership(&self.db, collection_id, isbn).await
    }

    async fn remove_book(&self, collection_id: i32, isbn: &str) -> Result<(), DomainError> {
        check_keys(collection_id, isbn)?;

        let now = chrono::Utc::now().to_rfc3339();
        let result = CollectionBookEntity::soft_delete_where(
            Condition::all()
                .add(collection_book::Column::CollectionId.eq(collection_id))
                .add(collection_book::Column::BookIsbn.eq(isbn)),
            &now,
        )
        .exec(&self.db)
        .await?;

        tracing::debug!(
            "Unlinked book {} from collection {} ({} row(s))",
            isbn,
            collection_id,
            result.rows_affected
        );
        Ok(())
    }
}
