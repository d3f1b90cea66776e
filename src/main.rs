use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use pokemon_coach::{
    export_to_path, logging, CoachConfig, Collection, PokeApiClient, RecordService, SpeciesRecord,
    SqliteStore,
};

#[derive(Parser)]
#[command(name = "pokemon-coach", version, about = "Fetch, save and review Pokémon records")]
struct Cli {
    /// SQLite database file (overrides COACH_DB_PATH)
    #[arg(long, global = true, env = "COACH_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch a Pokémon by name or number and record it in history
    Fetch { identifier: String },
    /// Save a record given as JSON, e.g. '{"name":"pikachu","types":"electric"}'
    Save { json: String },
    /// List saved records
    Saved,
    /// List query history, newest first
    History,
    /// Export a collection to CSV
    Export {
        #[arg(value_enum)]
        collection: Collection,
        path: PathBuf,
    },
}

fn main() -> Result<()> {
    logging::init(logging::DEFAULT_FILTER);
    let cli = Cli::parse();

    let mut config = CoachConfig::from_env().context("Failed to load configuration")?;
    if let Some(db) = cli.db {
        config = config.with_db_path(db);
    }

    let store = Arc::new(
        SqliteStore::open(&config.db_path)
            .with_context(|| format!("Failed to open database {}", config.db_path.display()))?,
    );
    let source = Arc::new(
        PokeApiClient::new(config.base_url.as_str(), config.http_timeout)
            .context("Failed to build provider client")?,
    );
    let service = RecordService::new(source, store);

    match cli.command {
        Command::Fetch { identifier } => {
            let record = service.fetch_and_record(&identifier)?;
            print_json(&record)?;
        }
        Command::Save { json } => {
            let record: SpeciesRecord =
                serde_json::from_str(&json).context("Record must be a JSON object")?;
            let id = service.save(&record)?;
            println!("✓ Saved record #{}", id);
        }
        Command::Saved => {
            let saved = service.list_saved()?;
            print_json(&saved)?;
            eprintln!("✓ {} saved records", saved.len());
        }
        Command::History => {
            let history = service.list_history()?;
            print_json(&history)?;
            eprintln!("✓ {} history entries", history.len());
        }
        Command::Export { collection, path } => {
            let rows = export_to_path(&service, collection, &path)?;
            println!(
                "✓ Exported {} {} rows to {}",
                rows,
                collection.name(),
                path.display()
            );
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
