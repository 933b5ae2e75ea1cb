//! `run()` parses arguments, builds the context, dispatches to a handler and
//! leaves error reporting to `main`.
//!
//! Document commands go through a `SwdocsApi` over either the local SQLite
//! file or, with `--server`, a `RemoteStore`. `serve` always opens the local
//! file, and `config` only ever touches the config file.

use super::print::{print_config, print_document, print_messages, print_summaries};
use super::setup::{Cli, Commands};
use clap::Parser;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use swdocs::api::SwdocsApi;
use swdocs::commands::config::ConfigAction;
use swdocs::config::{SwdocsConfig, SwdocsPaths};
use swdocs::error::{Result, SwdocsError};
use swdocs::model::{DocumentPayload, Sections};
use swdocs::store::remote::RemoteStore;
use swdocs::store::sqlite::SqliteStore;
use swdocs::store::{DocumentStore, RecentOrder};
use swdocs::{commands, logging, server};
use tracing::debug;

struct AppContext {
    api: SwdocsApi<Box<dyn DocumentStore>>,
    user: Option<String>,
}

impl AppContext {
    /// The `--user` flag wins over whatever the payload says.
    fn stamp_user(&self, mut payload: DocumentPayload) -> DocumentPayload {
        if let Some(user) = &self.user {
            payload.user = Some(user.clone());
        }
        payload
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let paths = SwdocsPaths::resolve()?;
    let config = SwdocsConfig::load(&paths.home)?.with_env_overrides()?;
    logging::init(&config.log_level);
    debug!(home = %paths.home.display(), "swdocs starting");

    let Cli {
        command,
        server,
        user,
    } = cli;
    let context = || init_context(&paths, &config, server.clone(), user.clone());

    match command {
        Commands::Serve { host, port } => handle_serve(&paths, config.clone(), host, port),
        Commands::Config { key, value } => handle_config(&paths, key, value),
        Commands::Create {
            name,
            description,
            file,
        } => handle_create(&context()?, name, description, file),
        Commands::Apply { file } => handle_apply(&context()?, &file),
        Commands::Get { name, json } => handle_get(&context()?, &name, json),
        Commands::List { updated, limit } => handle_list(&context()?, updated, limit),
        Commands::Search { pattern } => handle_search(&context()?, &pattern),
        Commands::Delete { name } => handle_delete(&context()?, &name),
    }
}

fn init_context(
    paths: &SwdocsPaths,
    config: &SwdocsConfig,
    server: Option<String>,
    user: Option<String>,
) -> Result<AppContext> {
    let store: Box<dyn DocumentStore> = match server {
        Some(url) => {
            debug!(server = %url, "using remote store");
            let remote = RemoteStore::new(&url)?;
            Box::new(match &user {
                Some(user) => remote.with_user(user.clone()),
                None => remote,
            })
        }
        None => Box::new(SqliteStore::open(config.sqlite_options(paths))?),
    };

    Ok(AppContext {
        api: SwdocsApi::new(store),
        user,
    })
}

fn handle_serve(
    paths: &SwdocsPaths,
    mut config: SwdocsConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    let store = SqliteStore::open(config.sqlite_options(paths))?;
    println!(
        "Serving {} on http://{}",
        store.path().display(),
        config.socket_addr()
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(server::serve(SwdocsApi::new(store), &config.socket_addr()))
}

fn handle_create(
    ctx: &AppContext,
    name: String,
    description: String,
    file: Option<PathBuf>,
) -> Result<()> {
    let mut payload = DocumentPayload::new(name, description);
    if let Some(file) = file {
        payload.sections = Sections::decode(&fs::read_to_string(&file)?)?;
    }

    let result = ctx.api.create_document(ctx.stamp_user(payload))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_apply(ctx: &AppContext, file: &str) -> Result<()> {
    let payload = read_payload(file)?;
    let result = ctx.api.apply_document(ctx.stamp_user(payload))?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_get(ctx: &AppContext, name: &str, json: bool) -> Result<()> {
    let result = ctx.api.get_document(name)?;
    for doc in &result.documents {
        if json {
            let out = serde_json::to_string_pretty(doc).map_err(SwdocsError::Serialization)?;
            println!("{}", out);
        } else {
            print_document(doc);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_list(ctx: &AppContext, updated: bool, limit: usize) -> Result<()> {
    let order = if updated {
        RecentOrder::Updated
    } else {
        RecentOrder::Created
    };
    let result = ctx.api.list_recent(order, limit)?;
    print_summaries(&result.summaries);
    print_messages(&result.messages);
    Ok(())
}

fn handle_search(ctx: &AppContext, pattern: &str) -> Result<()> {
    let result = ctx.api.search(pattern)?;
    print_summaries(&result.summaries);
    print_messages(&result.messages);
    Ok(())
}

fn handle_delete(ctx: &AppContext, name: &str) -> Result<()> {
    let result = ctx.api.delete_document(name)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(paths: &SwdocsPaths, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::ShowKey(key),
        (Some(key), Some(value)) => ConfigAction::Set(key, value),
    };

    let result = commands::config::run(paths, action)?;
    if result.has_errors() {
        let reason: Vec<&str> = result.messages.iter().map(|m| m.content.as_str()).collect();
        return Err(SwdocsError::Api(reason.join("; ")));
    }
    if result.messages.is_empty() {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}

fn read_payload(file: &str) -> Result<DocumentPayload> {
    let raw = if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(Path::new(file))?
    };
    serde_json::from_str(&raw)
        .map_err(|e| SwdocsError::Validation(format!("payload is not valid JSON: {}", e)))
}
