// Pokemon Coach - Core Library
// Fetch → normalize → persist pipeline, shared by the CLI and the API server

pub mod config;
pub mod error;
pub mod export;
pub mod fetcher;
pub mod logging;
pub mod normalizer;
pub mod record;
pub mod service;
pub mod store;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::CoachConfig;
pub use error::{CoachError, FetchError, Result};
pub use export::{export_to_path, write_history, write_saved, Collection};
pub use fetcher::{PokeApiClient, SpeciesSource};
pub use normalizer::normalize;
pub use record::{join_list, split_list, HistoryEntry, SpeciesRecord, StoredRecord, LIST_DELIMITER};
pub use service::RecordService;
pub use store::{setup_database, RecordStore, SqliteStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
