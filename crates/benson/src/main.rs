mod cache;
mod cli;
mod config;
mod error;
mod fetch;
mod instrument;
mod invalidation;
#[cfg_attr(feature = "sqlite", allow(dead_code))]
mod mock_data;
mod services;
mod state;
mod storage;

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::{
    cli::Cli,
    config::Config,
    state::{build_cache, Portal},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `--format json` output stays machine-readable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "benson=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    let cache = build_cache(&config)?;
    let today = chrono::Local::now().date_naive();

    #[cfg(not(feature = "sqlite"))]
    let repository = {
        let repository = Arc::new(storage::InMemoryRepository::new());
        mock_data::seed_demo_data(repository.clone(), today).await?;
        repository
    };

    #[cfg(feature = "sqlite")]
    let repository = {
        tracing::info!(path = %config.sqlite_path, "Using SQLite storage");
        Arc::new(storage::SqliteRepository::new(&config.sqlite_path).await?)
    };

    let portal = Portal::new(repository, cache, &config);
    cli::run(cli, &portal, today).await
}
