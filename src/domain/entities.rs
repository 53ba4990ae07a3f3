//! Catalog entities as seen by services and clients

use serde::{Deserialize, Serialize};

/// Two-state lifecycle carried by every soft-deletable row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Deleted { at: String },
}

impl Lifecycle {
    pub fn from_deleted_at(deleted_at: Option<&str>) -> Self {
        match deleted_at {
            None => Lifecycle::Active,
            Some(at) => Lifecycle::Deleted { at: at.to_string() },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Lifecycle::Active)
    }
}

/// Free-form bag stored alongside a book
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMetadata {
    #[serde(default)]
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub published_year: Option<i32>,
    pub metadata: BookMetadata,
    /// Current collections; only filled on single-book lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<Collection>>,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl Book {
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_deleted_at(self.deleted_at.as_deref())
    }
}

/// Body of book create/edit requests. Missing fields decode as empty so that
/// validation can report them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookInput {
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub published_year: Option<i32>,
    pub metadata: BookMetadata,
}

/// Book list filter. `None`/empty fields are ignored; the rest compose with AND.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BookFilter {
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub published_year: Option<i32>,
    /// Matches books carrying any of these genres
    pub genres: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
    // Calculated fields
    #[serde(default)]
    pub total_books: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub books: Option<Vec<Book>>,
}

impl Collection {
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_deleted_at(self.deleted_at.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionInput {
    pub name: String,
    pub description: String,
}

/// A book/collection association row
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    pub book_isbn: String,
    pub collection_id: i32,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl Membership {
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_deleted_at(self.deleted_at.as_deref())
    }
}
