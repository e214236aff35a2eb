//! Selah CLI
//!
//! Command-line interface for Selah - offline-first scripture reading.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use selah_core::{Config, FetchClient, ScriptureStore};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "selah")]
#[command(about = "Selah - offline-first scripture reader")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all books in canonical order
    Books,
    /// Read a chapter
    Read {
        /// Book abbreviation (e.g. gn, sl, jo)
        book: String,
        /// Chapter number
        chapter: u32,
    },
    /// Show a single verse
    Verse {
        /// Book abbreviation (e.g. gn, sl, jo)
        book: String,
        /// Chapter number
        chapter: u32,
        /// Verse number
        verse: u32,
    },
    /// Search verse text
    Search {
        /// Search query (case-insensitive substring)
        query: String,
        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Show today's verse (falls back to the local snapshot when offline)
    Daily,
    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json));
    let config = Config::load()?;

    // Config does not need the store
    if let Commands::Config { command } = &cli.command {
        return commands::config::handle(command.clone(), &config, &output);
    }

    let store = ScriptureStore::new(config.clone());
    store.initialize().await;

    match cli.command {
        Commands::Books => commands::books::list(&store, &output).await,
        Commands::Read { book, chapter } => {
            commands::read::chapter(&store, &book, chapter, &output).await
        }
        Commands::Verse {
            book,
            chapter,
            verse,
        } => commands::read::verse(&store, &book, chapter, verse, &output).await,
        Commands::Search { query, limit } => {
            commands::search::run(&store, &query, limit, &output).await
        }
        Commands::Daily => {
            commands::daily::run(&store, &FetchClient::new(), &config, &output).await
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}
