//! # Storage Layer
//!
//! This module defines the storage abstraction for swdocs. The
//! [`DocumentStore`] trait is the capability contract every backend honors;
//! the rest of the crate only talks to a store through it.
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteStore`]: production storage in an embedded SQLite file
//!   - one write connection, owned by the [`gate::WriteGate`]
//!   - a small round-robin pool of read connections
//!   - WAL journal, so reads proceed while a write is in flight
//!
//! - [`memory::InMemoryStore`]: in-memory storage for testing
//!   - no persistence
//!   - same gate, same ordering and matching rules
//!
//! - [`remote::RemoteStore`]: a client of a running `swdocs serve`
//!   - every call is one REST request
//!   - lets the CLI work against a shared server instead of a local file
//!
//! ## Contract
//!
//! - `name` is unique. `upsert` decides insert-vs-update atomically inside the
//!   backend; callers never check for existence first.
//! - `create`, `upsert` and `delete` run inside the write gate. Reads don't,
//!   and may observe the state before or after an in-flight write.
//! - `id` and `created` never change once assigned. `updated` strictly
//!   increases on every successful upsert.
//! - A lookup miss is [`SwdocsError::NotFound`](crate::error::SwdocsError),
//!   never an empty document.
//! - `delete` of a missing name succeeds and reports `false`.

use crate::error::Result;
use crate::model::{Document, DocumentPayload, DocumentSummary};
use crate::pattern::SearchPattern;
use serde::{Deserialize, Serialize};

pub mod gate;
pub mod memory;
pub mod remote;
pub mod sqlite;

/// Largest page the recent listings return.
pub const RECENT_PAGE_SIZE: usize = 15;

/// Which timestamp the recent listings sort on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecentOrder {
    #[default]
    Created,
    Updated,
}

impl RecentOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecentOrder::Created => "created",
            RecentOrder::Updated => "updated",
        }
    }
}

/// Clamps a requested page size to `1..=RECENT_PAGE_SIZE`.
pub fn page_limit(requested: usize) -> usize {
    requested.clamp(1, RECENT_PAGE_SIZE)
}

/// Abstract interface for document storage.
///
/// Implementations are shared between request handlers, so every method
/// takes `&self` and the trait requires `Send + Sync`.
pub trait DocumentStore: Send + Sync {
    /// Insert a new document; fails with `DuplicateName` if the name exists.
    fn create(&self, payload: &DocumentPayload) -> Result<Document>;

    /// Insert, or update description/sections/user of the existing document.
    fn upsert(&self, payload: &DocumentPayload) -> Result<Document>;

    /// Exact-match lookup.
    fn get_by_name(&self, name: &str) -> Result<Document>;

    /// Wildcard match on `name`, ordered by name.
    fn search(&self, pattern: &SearchPattern) -> Result<Vec<DocumentSummary>>;

    /// Newest first, ties broken by id descending, at most `limit` entries.
    fn list_recent(&self, order: RecentOrder, limit: usize) -> Result<Vec<DocumentSummary>>;

    /// Remove a document permanently. Returns whether a row was removed.
    fn delete(&self, name: &str) -> Result<bool>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Box<S> {
    fn create(&self, payload: &DocumentPayload) -> Result<Document> {
        (**self).create(payload)
    }

    fn upsert(&self, payload: &DocumentPayload) -> Result<Document> {
        (**self).upsert(payload)
    }

    fn get_by_name(&self, name: &str) -> Result<Document> {
        (**self).get_by_name(name)
    }

    fn search(&self, pattern: &SearchPattern) -> Result<Vec<DocumentSummary>> {
        (**self).search(pattern)
    }

    fn list_recent(&self, order: RecentOrder, limit: usize) -> Result<Vec<DocumentSummary>> {
        (**self).list_recent(order, limit)
    }

    fn delete(&self, name: &str) -> Result<bool> {
        (**self).delete(name)
    }
}
