//! # Swdocs Architecture
//!
//! Swdocs is a catalog of software documents: each document is a named
//! collection of sections, and each section a list of links (dashboards,
//! runbooks, repositories). Documents are kept in an embedded SQLite file and
//! served over a small REST API.
//!
//! Like any client of this library, the bundled CLI and HTTP server only talk
//! to the core through the API facade.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Front ends                                                 │
//! │  - HTTP server (server/): axum routes, JSON in and out      │
//! │  - CLI (binary only): clap parsing, terminal output         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation and result shaping                            │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DocumentStore trait                             │
//! │  - SqliteStore (production), InMemoryStore (testing),       │
//! │    RemoteStore (client of a running server)                 │
//! │  - WriteGate: one writer at a time, bounded wait            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes regular Rust arguments and returns
//! `Result<CmdResult>`. It never writes to stdout/stderr and never exits the
//! process. Diagnostics go through `tracing`; the binary decides where they
//! end up (see [`logging`]).
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): unit tests against `InMemoryStore`.
//! 2. **Stores** (`store/`): unit tests per backend; SQLite against a temp file.
//! 3. **API** (`api.rs`): dispatch tests.
//! 4. **Integration** (`tests/`): the router via `tower::ServiceExt`, the
//!    remote store against a mock server, and the binary via `assert_cmd`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: One module per operation
//! - [`store`]: Storage abstraction, backends and the write gate
//! - [`model`]: Documents, sections, links and their projections
//! - [`pattern`]: Name search wildcards
//! - [`timestamp`]: Timestamp formats and the monotonic stamp clock
//! - [`server`]: REST API
//! - [`config`]: Configuration management
//! - [`logging`]: Subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod pattern;
pub mod server;
pub mod store;
pub mod timestamp;
