//! # swdocs binary
//!
//! The binary is intentionally thin: the CLI lives in `cli/`, and this file
//! only invokes `cli::run()` and handles process termination.
//!
//! ```text
//! swdocs serve                      # REST API over the local database
//! swdocs create --name kafka        # local database
//! swdocs --server URL list          # any command, against a running server
//! ```

mod cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
