//! Command-line interface for word_tree.

use clap::{Parser, Subcommand};

/// Word Tree - multiplayer word guessing game service
#[derive(Parser, Debug)]
#[command(name = "word_tree")]
#[command(about = "Game store, engine, and realtime relay for the word game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file; flags override its values
    #[arg(short, long)]
    pub config: Option<std::path::PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the websocket relay server
    Relay {
        /// Port to bind to (default 8081)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (default 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
    },

    /// Seed the word catalog with the starter set
    Seed {
        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },

    /// Add a word to the catalog
    AddWord {
        /// The word to add (stored uppercased)
        word: String,

        /// Language code: tm, en, or ru
        language: String,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,
    },
}
