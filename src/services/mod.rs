//! Services Layer
//!
//! This module contains pure business logic extracted from HTTP handlers.
//! Services work against the repository traits, never a concrete store.

pub mod membership_service;

// Re-export for convenience
pub use membership_service::{
    MembershipChange, ReconcileOutcome, ReconcilePlan, add_books, plan, remove_books,
};
