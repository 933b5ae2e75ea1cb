use clap::{Parser, Subcommand};
use std::path::PathBuf;
use swdocs::store::RECENT_PAGE_SIZE;

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.0" for releases, "0.3.0@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "swdocs", bin_name = "swdocs", version = get_version())]
#[command(about = "A catalog of software documents and their links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Use a running swdocs server instead of the local database
    #[arg(long, global = true, env = "SWDOCS_SERVER", value_name = "URL")]
    pub server: Option<String>,

    /// Name recorded as the author of writes
    #[arg(long, global = true, env = "SWDOCS_USER")]
    pub user: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the REST API over the local database
    #[command(display_order = 1)]
    Serve {
        /// Address to bind (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to the configured port)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create a new document; fails if the name is taken
    #[command(alias = "n", display_order = 2)]
    Create {
        /// The document name, used in its URL
        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        description: String,

        /// JSON file holding the document's sections array
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Create or update a document from a JSON payload
    #[command(display_order = 3)]
    Apply {
        /// Payload file, or "-" for stdin
        #[arg(short, long)]
        file: String,
    },

    /// Show one document
    #[command(alias = "v", display_order = 4)]
    Get {
        name: String,

        /// Print the raw JSON document
        #[arg(long)]
        json: bool,
    },

    /// List the most recent documents
    #[command(alias = "ls", display_order = 5)]
    List {
        /// Order by last update instead of creation
        #[arg(long)]
        updated: bool,

        #[arg(long, default_value_t = RECENT_PAGE_SIZE)]
        limit: usize,
    },

    /// Search document names ("%" and "_" are wildcards)
    #[command(display_order = 6)]
    Search { pattern: String },

    /// Delete a document
    #[command(alias = "rm", display_order = 7)]
    Delete { name: String },

    /// Get or set configuration
    #[command(display_order = 8)]
    Config {
        /// Configuration key (e.g., port)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
