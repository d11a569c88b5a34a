//! Lumina application binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Load the product catalog
//! 3. Open selection storage (SQLite, or memory with --ephemeral)
//! 4. Restore the session and connect the chat adapter
//! 5. Run the line-based REPL on stdin
//! 6. Wait for outstanding exchanges, then flush the chat window

mod cli;
mod commands;
mod exchanges;
mod render;

use std::sync::Arc;

use clap::Parser;
use console::Term;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::Notify;

use lumina_chat::{ChatAdapter, Exchange, HttpTransport, Session};
use lumina_core::catalog::CatalogStore;
use lumina_core::config::LuminaConfig;
use lumina_core::events::EventBus;
use lumina_core::store::{KeyValueStore, MemoryStore};
use lumina_storage::{Database, SqliteStore};

use crate::cli::{expand_home, CliArgs};
use crate::commands::{Action, Command};
use crate::exchanges::Exchanges;

type Adapter = ChatAdapter<HttpTransport>;

fn open_store(
    config: &LuminaConfig,
    ephemeral: bool,
) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    if ephemeral {
        tracing::info!("Ephemeral mode: selection kept in memory");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let data_dir = expand_home(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join(&config.storage.database_file);
    let db = Database::new(&db_path)?;
    Ok(Arc::new(SqliteStore::new(Arc::new(db))))
}

/// Run one exchange in the background and report a dropped submission.
fn spawn_exchange(
    exchanges: &mut Exchanges,
    session: &Arc<Session>,
    adapter: &Arc<Adapter>,
    term: &Term,
    input: Option<String>,
) {
    let session = Arc::clone(session);
    let adapter = Arc::clone(adapter);
    let term = term.clone();
    exchanges.spawn(async move {
        let outcome = match input {
            Some(text) => adapter.ask(&session, &text).await,
            None => adapter.generate_routine(&session).await,
        };
        if outcome == Exchange::Busy {
            write(&term, &render::notice("Still working on the previous request."));
        }
        outcome
    });
}

fn write(term: &Term, line: &str) {
    if let Err(e) = term.write_line(line) {
        tracing::warn!(error = %e, "Failed to write to terminal");
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = LuminaConfig::load_or_default(&config_file);
    args.apply_overrides(&mut config);

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Lumina v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Catalog.
    let catalog_store = CatalogStore::new(expand_home(&config.catalog.path));
    let catalog = match catalog_store.get() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::error!(
                path = %catalog_store.source().display(),
                error = %e,
                "Failed to load catalog"
            );
            return Err(e.into());
        }
    };

    // Session.
    let store = open_store(&config, args.ephemeral)?;
    let events = EventBus::default();
    let session = Arc::new(Session::restore(
        catalog,
        store,
        config.storage.selection_key.clone(),
        events.clone(),
    )?);
    let adapter = Arc::new(ChatAdapter::new(HttpTransport::new(config.chat.endpoint.clone())));
    tracing::info!(endpoint = %config.chat.endpoint, "Chat adapter ready");

    let term = Term::stdout();
    let shutdown = Arc::new(Notify::new());
    let renderer = tokio::spawn(render::follow_display(
        Arc::clone(&session),
        events.subscribe(),
        term.clone(),
        Arc::clone(&shutdown),
    ));

    let banner = format!(
        "{} products, {} selected. Type /help for commands.",
        session.catalog().len(),
        session.selected_products().len()
    );
    write(&term, &render::notice(&banner));

    // REPL.
    let mut exchanges = Exchanges::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                write(&term, &render::error_line(&e.to_string()));
                continue;
            }
        };

        match commands::execute(command, &session) {
            Ok(Action::Print(output)) => output.iter().for_each(|l| write(&term, l)),
            Ok(Action::Ask(text)) => {
                spawn_exchange(&mut exchanges, &session, &adapter, &term, Some(text))
            }
            Ok(Action::Routine) => spawn_exchange(&mut exchanges, &session, &adapter, &term, None),
            Ok(Action::Quit) => break,
            Ok(Action::Nothing) => {}
            Err(e) => write(&term, &render::error_line(&e.to_string())),
        }
    }

    if exchanges.pending() > 0 {
        tracing::info!(pending = exchanges.pending(), "Waiting for outstanding exchanges");
    }
    exchanges.drain().await;

    shutdown.notify_one();
    if let Err(e) = renderer.await {
        tracing::warn!(error = %e, "Display renderer failed");
    }

    tracing::info!("Lumina shutting down");
    Ok(())
}
