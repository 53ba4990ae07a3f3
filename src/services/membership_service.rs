//! Membership Service - batch add/remove of books in a collection
//!
//! Each call reads the collection's current members once, plans the minimal
//! set of changes, then applies them one ISBN at a time. Requests that would
//! not change anything are skipped, so repeating a call is always safe.
//!
//! Add targets are all resolved before the first write: an unknown ISBN fails
//! the batch with nothing applied. The store offers no cross-statement
//! transaction here, so a storage failure during the write phase stops the
//! batch and leaves earlier writes in place (`DomainError::PartialBatch`).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::{BookRepository, CollectionRepository, DomainError, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Add,
    Remove,
}

/// Which requested ISBNs need a write and which are already settled
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub targets: Vec<String>,
    pub unchanged: Vec<String>,
}

/// Result of a reconciliation call, returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileOutcome {
    pub collection_id: i32,
    pub changed: Vec<String>,
    pub unchanged: Vec<String>,
}

/// Split `requested` against the current member set. Duplicates are
/// collapsed and request order is kept.
pub fn plan(
    current: &HashSet<String>,
    requested: &[String],
    change: MembershipChange,
) -> ReconcilePlan {
    let mut seen = HashSet::new();
    let mut plan = ReconcilePlan::default();

    for isbn in requested {
        if !seen.insert(isbn.as_str()) {
            continue;
        }
        let is_member = current.contains(isbn);
        let needs_write = match change {
            MembershipChange::Add => !is_member,
            MembershipChange::Remove => is_member,
        };
        if needs_write {
            plan.targets.push(isbn.clone());
        } else {
            plan.unchanged.push(isbn.clone());
        }
    }

    plan
}

pub async fn add_books(
    books: &dyn BookRepository,
    collections: &dyn CollectionRepository,
    collection_id: i32,
    isbns: &[String],
) -> Result<ReconcileOutcome, DomainError> {
    reconcile(books, collections, collection_id, isbns, MembershipChange::Add).await
}

pub async fn remove_books(
    books: &dyn BookRepository,
    collections: &dyn CollectionRepository,
    collection_id: i32,
    isbns: &[String],
) -> Result<ReconcileOutcome, DomainError> {
    reconcile(books, collections, collection_id, isbns, MembershipChange::Remove).await
}

async fn reconcile(
    books: &dyn BookRepository,
    collections: &dyn CollectionRepository,
    collection_id: i32,
    isbns: &[String],
    change: MembershipChange,
) -> Result<ReconcileOutcome, DomainError> {
    collections
        .find_by_id(collection_id)
        .await?
        .ok_or_else(|| DomainError::not_found(EntityKind::Collection, collection_id))?;

    // Reads of the current member set happen before any write
    let current: HashSet<String> = collections
        .get_books(collection_id)
        .await?
        .into_iter()
        .map(|b| b.isbn)
        .collect();

    let plan = plan(&current, isbns, change);
    tracing::info!(
        "Reconcile {:?} on collection {}: {} to write, {} unchanged",
        change,
        collection_id,
        plan.targets.len(),
        plan.unchanged.len()
    );

    if change == MembershipChange::Add {
        for isbn in &plan.targets {
            if books.find_by_isbn(isbn).await?.is_none() {
                tracing::warn!(
                    "Book {} not found, collection {} left unchanged",
                    isbn,
                    collection_id
                );
                return Err(DomainError::not_found(EntityKind::Book, isbn));
            }
        }
    }

    let planned = plan.targets.len();
    for (applied, isbn) in plan.targets.iter().enumerate() {
        let result = match change {
            MembershipChange::Add => collections.add_book(collection_id, isbn).await,
            MembershipChange::Remove => collections.remove_book(collection_id, isbn).await,
        };

        if let Err(e) = result {
            tracing::error!(
                "Reconcile on collection {} stopped at {}: {}",
                collection_id,
                isbn,
                e
            );
            return Err(match e {
                DomainError::Storage(reason) if applied > 0 => DomainError::PartialBatch {
                    applied,
                    planned,
                    reason,
                },
                other => other,
            });
        }
    }

    Ok(ReconcileOutcome {
        collection_id,
        changed: plan.targets,
        unchanged: plan.unchanged,
    })
}
