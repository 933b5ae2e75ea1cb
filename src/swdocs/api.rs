//! # API Facade
//!
//! The API layer is a thin facade over the command layer and the single entry
//! point for every swdocs operation, whichever front end is driving it. The
//! HTTP server and the CLI both hold a `SwdocsApi`.
//!
//! The facade dispatches to `commands/*.rs` and returns `Result<CmdResult>`.
//! It does no printing and no formatting, and holds no business rules of its
//! own: validation lives in the commands, uniqueness and ordering in the store.
//!
//! `SwdocsApi<S: DocumentStore>` is generic over the backend:
//! - server: `SwdocsApi<SqliteStore>`
//! - CLI: `SwdocsApi<Box<dyn DocumentStore>>` (local file or remote server)
//! - tests: `SwdocsApi<InMemoryStore>`
//!
//! Every method takes `&self`; the facade is shared across request handlers
//! behind an `Arc` and the store serializes its own writes.
//!
//! Configuration is not behind the facade: `commands::config` works on the
//! config file alone, so it stays usable when the configured store can't be
//! opened.

use crate::commands;
use crate::error::Result;
use crate::model::DocumentPayload;
use crate::store::{DocumentStore, RecentOrder};

pub struct SwdocsApi<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> SwdocsApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn create_document(&self, payload: DocumentPayload) -> Result<commands::CmdResult> {
        commands::create::run(&self.store, payload)
    }

    pub fn apply_document(&self, payload: DocumentPayload) -> Result<commands::CmdResult> {
        commands::apply::run(&self.store, payload)
    }

    pub fn get_document(&self, name: &str) -> Result<commands::CmdResult> {
        commands::get::run(&self.store, name)
    }

    pub fn list_recent(&self, order: RecentOrder, limit: usize) -> Result<commands::CmdResult> {
        commands::list::run(&self.store, order, limit)
    }

    pub fn search(&self, term: &str) -> Result<commands::CmdResult> {
        commands::search::run(&self.store, term)
    }

    pub fn delete_document(&self, name: &str) -> Result<commands::CmdResult> {
        commands::delete::run(&self.store, name)
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}
