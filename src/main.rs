//! Word Tree - Unified CLI
//!
//! Relay server and word catalog maintenance.

use std::str::FromStr;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use word_tree::{AppConfig, Cli, Command, GameStore, Language, STARTER_WORDS};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::default(),
    };

    match cli.command {
        Command::Relay { port, host } => {
            let host = host.unwrap_or_else(|| config.relay_host().clone());
            let port = port.unwrap_or(*config.relay_port());
            word_tree::run_relay(&host, port).await
        }
        Command::Seed { db_path } => {
            seed(&db_path.unwrap_or_else(|| config.database_path().clone()))
        }
        Command::AddWord {
            word,
            language,
            db_path,
        } => add_word(
            &db_path.unwrap_or_else(|| config.database_path().clone()),
            &word,
            &language,
        ),
    }
}

/// Seed the word catalog with the starter set.
fn seed(db_path: &str) -> Result<()> {
    let store = GameStore::open(db_path)?;
    let added = store.seed_words(STARTER_WORDS)?;
    info!(db_path, added, "Word catalog seeded");
    Ok(())
}

/// Add a single word to the catalog.
fn add_word(db_path: &str, word: &str, language: &str) -> Result<()> {
    let language = Language::from_str(language)
        .map_err(|_| anyhow::anyhow!("Unknown language '{language}', expected tm, en, or ru"))?;
    let store = GameStore::open(db_path)?;
    match store.add_word(word, language)? {
        Some(word) => info!(word = %word.word(), id = %word.id(), "Word added"),
        None => info!(word, "Word already in the catalog (or empty), nothing added"),
    }
    Ok(())
}
