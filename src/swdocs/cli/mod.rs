//! # CLI
//!
//! One client of the swdocs library; the only place that knows about
//! terminal output and exit codes.
//!
//! - `setup`: argument parsing via clap
//! - `commands`: context wiring and per-command handlers
//! - `print`: terminal formatting of `CmdResult` contents

mod commands;
mod print;
mod setup;

pub use commands::run;
