//! Suggest-RS: search-as-you-type suggestions in the terminal
//!
//! This is the main entry point for the application.

use anyhow::Result;
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use suggest_rs::{
    config,
    network::HttpClient,
    provider::{OpenSearch, SearchProvider},
    storage::{open_store, SnapshotStore},
    terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "suggest-rs", version, about = "Search-as-you-type suggestions")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print suggestions for one term and exit
    #[arg(short, long)]
    query: Option<String>,

    /// Write logs to this file (interactive mode logs nowhere otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    info!("Starting Suggest-RS v{}", suggest_rs::VERSION);

    let settings = config::load(cli.config.as_deref())?;

    let client = HttpClient::with_settings(&settings.outgoing)?;
    let provider: Arc<dyn SearchProvider> =
        Arc::new(OpenSearch::from_settings(client, &settings.provider)?);
    info!("Using provider at {}", settings.provider.api_url);

    if let Some(term) = cli.query {
        return print_suggestions(provider.as_ref(), term.trim(), settings.suggest.limit).await;
    }

    let snapshots = SnapshotStore::new(open_store(&settings.storage), settings.storage.retention());
    terminal::run(&settings, provider, snapshots).await
}

/// Logs go to `--log-file` when given; one-shot mode falls back to stderr
fn init_logging(cli: &Cli) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match (&cli.log_file, &cli.query) {
        (Some(path), _) => {
            let file = File::create(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        (None, Some(_)) => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        (None, None) => {}
    }
    Ok(())
}

async fn print_suggestions(provider: &dyn SearchProvider, term: &str, limit: u32) -> Result<()> {
    let items = provider.search(term, limit).await?.into_suggestions();
    if items.is_empty() {
        println!("No suggestions for {:?}", term);
    }
    for item in items {
        match (item.description(), item.url()) {
            (Some(description), Some(url)) => {
                println!("{}\t{}\t{}", item.title(), description, url)
            }
            (None, Some(url)) => println!("{}\t{}", item.title(), url),
            _ => println!("{}", item.title()),
        }
    }
    Ok(())
}
