// 📤 CSV Export - dump either collection for spreadsheets and backups

use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{CoachError, Result};
use crate::record::{HistoryEntry, SpeciesRecord, StoredRecord};
use crate::service::RecordService;

/// Which collection to export
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Collection {
    Saved,
    History,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Saved => "saved",
            Collection::History => "history",
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp: Option<String>,
    name: &'a str,
    height: Option<u32>,
    weight: Option<u32>,
    types: String,
    abilities: String,
}

impl<'a> CsvRow<'a> {
    fn new(id: i64, timestamp: Option<String>, record: &'a SpeciesRecord) -> Self {
        CsvRow {
            id,
            timestamp,
            name: record.name.as_deref().unwrap_or_default(),
            height: record.height,
            weight: record.weight,
            types: record.types_joined(),
            abilities: record.abilities_joined(),
        }
    }
}

/// Write saved records as CSV, returning the number of rows
pub fn write_saved<W: Write>(records: &[StoredRecord], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    for stored in records {
        wtr.serialize(CsvRow::new(stored.id, None, &stored.record))?;
    }
    wtr.flush().map_err(|e| CoachError::Export(e.to_string()))?;
    Ok(records.len())
}

/// Write history entries as CSV (newest first, as listed), returning the number of rows
pub fn write_history<W: Write>(entries: &[HistoryEntry], writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    for entry in entries {
        let timestamp = Some(entry.timestamp.to_rfc3339());
        wtr.serialize(CsvRow::new(entry.id, timestamp, &entry.record))?;
    }
    wtr.flush().map_err(|e| CoachError::Export(e.to_string()))?;
    Ok(entries.len())
}

/// Export one collection to a CSV file
///
/// The collection is read before the file is touched, so a failed listing
/// leaves any existing file as it was.
pub fn export_to_path(
    service: &RecordService,
    collection: Collection,
    path: &Path,
) -> Result<usize> {
    let create = || {
        File::create(path)
            .map_err(|e| CoachError::Export(format!("cannot create {}: {}", path.display(), e)))
    };

    match collection {
        Collection::Saved => {
            let records = service.list_saved()?;
            write_saved(&records, create()?)
        }
        Collection::History => {
            let entries = service.list_history()?;
            write_history(&entries, create()?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::fetcher::SpeciesSource;
    use crate::store::{RecordStore, SqliteStore};
    use serde_json::Value;
    use std::sync::Arc;

    struct Offline;

    impl SpeciesSource for Offline {
        fn fetch(&self, _identifier: &str) -> std::result::Result<Value, FetchError> {
            Err(FetchError::Transport("offline".to_string()))
        }
    }

    /// Store whose listings always fail
    struct UnreadableStore;

    impl RecordStore for UnreadableStore {
        fn initialize(&self) -> Result<()> {
            Ok(())
        }

        fn insert_saved(&self, _record: &SpeciesRecord) -> Result<i64> {
            Err(CoachError::Storage("read-only".to_string()))
        }

        fn insert_history(&self, _record: &SpeciesRecord) -> Result<HistoryEntry> {
            Err(CoachError::Storage("read-only".to_string()))
        }

        fn list_saved(&self) -> Result<Vec<StoredRecord>> {
            Err(CoachError::Storage("disk I/O error".to_string()))
        }

        fn list_history(&self) -> Result<Vec<HistoryEntry>> {
            Err(CoachError::Storage("disk I/O error".to_string()))
        }
    }

    #[test]
    fn test_write_saved_csv() {
        let records = vec![
            StoredRecord {
                id: 1,
                record: SpeciesRecord::new("pikachu")
                    .with_height(4)
                    .with_weight(60)
                    .with_types(["electric"])
                    .with_abilities(["static", "lightning-rod"]),
            },
            StoredRecord {
                id: 2,
                record: SpeciesRecord::new("ditto"),
            },
        ];

        let mut out = Vec::new();
        let rows = write_saved(&records, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(rows, 2);
        assert_eq!(
            text,
            "id,name,height,weight,types,abilities\n\
             1,pikachu,4,60,electric,\"static, lightning-rod\"\n\
             2,ditto,,,,\n"
        );
    }

    #[test]
    fn test_write_history_csv_includes_timestamp() {
        let entries = vec![HistoryEntry {
            id: 9,
            timestamp: "2025-01-05T10:30:00Z".parse().unwrap(),
            record: SpeciesRecord::new("mew").with_types(["psychic"]),
        }];

        let mut out = Vec::new();
        write_history(&entries, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,timestamp,name,height,weight,types,abilities")
        );
        assert_eq!(
            lines.next(),
            Some("9,2025-01-05T10:30:00+00:00,mew,,,psychic,")
        );
    }

    #[test]
    fn test_export_to_path_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.csv");
        let store = Arc::new(SqliteStore::open_in_memory().unwrap());
        store.insert_saved(&SpeciesRecord::new("eevee")).unwrap();
        let service = RecordService::new(Arc::new(Offline), store);

        let rows = export_to_path(&service, Collection::Saved, &path).unwrap();

        assert_eq!(rows, 1);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "id,name,height,weight,types,abilities\n1,eevee,,,,\n"
        );
    }

    #[test]
    fn test_failed_listing_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let service = RecordService::new(Arc::new(Offline), Arc::new(UnreadableStore));

        for collection in [Collection::Saved, Collection::History] {
            let path = dir.path().join(format!("{}.csv", collection.name()));

            let err = export_to_path(&service, collection, &path).unwrap_err();

            assert!(err.is_storage());
            assert!(!path.exists());
        }
    }

    #[test]
    fn test_failed_listing_keeps_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");
        std::fs::write(&path, "previous export\n").unwrap();
        let service = RecordService::new(Arc::new(Offline), Arc::new(UnreadableStore));

        assert!(export_to_path(&service, Collection::History, &path).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous export\n");
    }
}
