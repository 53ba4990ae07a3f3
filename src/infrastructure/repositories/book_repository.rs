//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set, SqlErr, Value,
};

use super::collection_repository::count_members;
use crate::domain::{
    Book, BookFilter, BookInput, BookRepository, Collection, DomainError, EntityKind, FieldError,
};
use crate::models::SoftDelete;
use crate::models::book::{ActiveModel, Column, Entity as BookEntity, encode_metadata};
use crate::models::collection::{self, Entity as CollectionEntity};
use crate::models::collection_book;

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// `metadata.genres` shares at least one element with `genres`.
///
/// Every genre is bound as a parameter; only `?` placeholders are generated.
pub(crate) fn genres_intersect(genres: &[String]) -> SimpleExpr {
    let placeholders = vec!["?"; genres.len()].join(", ");
    let mut values: Vec<Value> = Vec::with_capacity(genres.len() + 1);
    values.push("$.genres".into());
    values.extend(genres.iter().map(|g| Value::from(g.as_str())));

    Expr::cust_with_values(
        format!(
            r#"EXISTS (SELECT 1 FROM json_each("books"."metadata", ?) WHERE json_each.value IN ({}))"#,
            placeholders
        ),
        values,
    )
}

fn duplicate_isbn() -> DomainError {
    DomainError::Validation(vec![FieldError {
        field: "isbn".to_string(),
        message: "already exists".to_string(),
    }])
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self, filter: BookFilter) -> Result<Vec<Book>, DomainError> {
        tracing::debug!("List books - Filters: {:?}", filter);

        let mut query = BookEntity::find_active();

        // Apply filters
        if let Some(isbn) = &filter.isbn
            && !isbn.is_empty()
        {
            query = query.filter(Column::Isbn.eq(isbn.as_str()));
        }

        if let Some(title) = &filter.title
            && !title.is_empty()
        {
            query = query.filter(Column::Title.eq(title.as_str()));
        }

        if let Some(author) = &filter.author
            && !author.is_empty()
        {
            query = query.filter(Column::Author.eq(author.as_str()));
        }

        if let Some(description) = &filter.description
            && !description.is_empty()
        {
            query = query.filter(Column::Description.eq(description.as_str()));
        }

        if let Some(year) = filter.published_year {
            query = query.filter(Column::PublishedYear.eq(year));
        }

        let genres: Vec<String> = filter
            .genres
            .iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if !genres.is_empty() {
            query = query.filter(genres_intersect(&genres));
        }

        let books = query
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Isbn)
            .all(&self.db)
            .await?;

        tracing::debug!("DB query returned {} books", books.len());
        Ok(books.into_iter().map(Book::from).collect())
    }

    async fn find_by_isbn(&self, isbn: &str) -> Result<Option<Book>, DomainError> {
        let book = BookEntity::find_active()
            .filter(Column::Isbn.eq(isbn))
            .one(&self.db)
            .await?;

        Ok(book.map(Book::from))
    }

    async fn create(&self, input: BookInput) -> Result<Book, DomainError> {
        let isbn = input.isbn.trim().to_string();

        // Soft-deleted rows still own their ISBN
        if BookEntity::find_by_id(isbn.clone())
            .one(&self.db)
            .await?
            .is_some()
        {
            return Err(duplicate_isbn());
        }

        let now = chrono::Utc::now().to_rfc3339();
        let new_book = ActiveModel {
            isbn: Set(isbn),
            title: Set(input.title.trim().to_string()),
            author: Set(input.author.trim().to_string()),
            description: Set(input.description),
            published_year: Set(input.published_year),
            metadata: Set(encode_metadata(&input.metadata)),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            deleted_at: Set(None),
        };

        match new_book.insert(&self.db).await {
            Ok(model) => {
                tracing::info!("Book {} created", model.isbn);
                Ok(Book::from(model))
            }
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(duplicate_isbn())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update(&self, isbn: &str, input: BookInput) -> Result<Book, DomainError> {
        let existing = BookEntity::find_active()
            .filter(Column::Isbn.eq(isbn))
            .one(&self.db)
            .await?
            .ok_or_else(|| DomainError::not_found(EntityKind::Book, isbn))?;

        let now = chrono::Utc::now().to_rfc3339();

        // created_at is left untouched
        let mut active: ActiveModel = existing.into();
        active.title = Set(input.title.trim().to_string());
        active.author = Set(input.author.trim().to_string());
        active.description = Set(input.description);
        active.published_year = Set(input.published_year);
        active.metadata = Set(encode_metadata(&input.metadata));
        active.updated_at = Set(now);

        let result = active.update(&self.db).await?;
        tracing::info!("Book {} updated", result.isbn);
        Ok(Book::from(result))
    }

    async fn soft_delete(&self, isbn: &str) -> Result<(), DomainError> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = BookEntity::soft_delete_where(Column::Isbn.eq(isbn), &now)
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found(EntityKind::Book, isbn));
        }

        tracing::info!("Book {} soft-deleted", isbn);
        Ok(())
    }

    async fn get_collections(&self, isbn: &str) -> Result<Vec<Collection>, DomainError> {
        let collections = CollectionEntity::find_active()
            .join(
                JoinType::InnerJoin,
                collection::Relation::CollectionBook.def(),
            )
            .filter(collection_book::Column::BookIsbn.eq(isbn))
            .filter(collection_book::Column::DeletedAt.is_null())
            .order_by_asc(collection::Column::Id)
            .all(&self.db)
            .await?;

        let mut result = Vec::with_capacity(collections.len());
        for col in collections {
            let total = count_members(&self.db, col.id).await?;
            result.push(col.into_domain(total));
        }

        Ok(result)
    }
}
