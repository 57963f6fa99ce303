use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::App;
use crate::config::KeyResolver;
use crate::session::{IdentityStrategy, Session};
use crate::store::JsonFileStore;

mod app;
mod autocomplete;
mod browse;
mod cli;
pub mod commands;
mod config;
mod draft;
mod model;
mod screen;
mod search;
mod seed;
mod session;
mod store;
mod suggest;
mod theme;
pub mod tui;
mod ui;

pub use theme::Theme;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = initialize_logging()?;
    info!("Starting findit");

    let args = cli::Args::parse();

    let mut config = config::load()?;
    if let Some(path) = &args.data {
        config.data.path.clone_from(path);
    }
    info!(path = %config.data.path.display(), "Using item file");

    let resolver = Arc::new(KeyResolver::new(Arc::new(config.keybindings.clone())));
    let store = Arc::new(JsonFileStore::new(config.data.path.clone()));
    if args.seed {
        seed::seed_if_empty(store.as_ref()).await?;
    }
    let session = Session::new(IdentityStrategy::detect(&config.auth));

    let mut app = App::new(&config, resolver, store, session, args.destination());
    app.run().await?;

    Ok(())
}

fn initialize_logging() -> Result<WorkerGuard> {
    let directory = config::data_dir().map_or_else(
        || std::path::PathBuf::from("logs"),
        |path| path.join("logs"),
    );
    std::fs::create_dir_all(&directory)?;

    let file_appender = tracing_appender::rolling::daily(&directory, "findit.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_file(true)
                .with_line_number(true)
                .with_thread_ids(true),
        )
        .init();

    Ok(guard)
}
