// 🗄️ Record Store - SQLite persistence for saved records and history
//
// Two append-only tables. List fields are stored joined with ", " since
// SQLite has no native sequence column.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tracing::debug;

use crate::error::{CoachError, Result};
use crate::record::{join_list, split_list, HistoryEntry, SpeciesRecord, StoredRecord};

// ============================================================================
// STORE TRAIT
// ============================================================================

/// RecordStore - durable home for the two collections
///
/// Implementations serialize their own writes; callers add no locking.
pub trait RecordStore: Send + Sync {
    /// Create both collections if absent. Safe to call repeatedly.
    fn initialize(&self) -> Result<()>;

    /// Append to the saved collection, returning the assigned id
    fn insert_saved(&self, record: &SpeciesRecord) -> Result<i64>;

    /// Append to history with a store-assigned timestamp
    fn insert_history(&self, record: &SpeciesRecord) -> Result<HistoryEntry>;

    /// All saved rows, insertion order
    fn list_saved(&self) -> Result<Vec<StoredRecord>>;

    /// All history rows, newest first
    fn list_history(&self) -> Result<Vec<HistoryEntry>>;
}

// ============================================================================
// SCHEMA
// ============================================================================

pub fn setup_database(conn: &Connection) -> Result<()> {
    // ==========================================================================
    // Saved Records Table (explicit saves, duplicates allowed)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS saved_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) > 0),
            height INTEGER CHECK (height IS NULL OR height >= 0),
            weight INTEGER CHECK (weight IS NULL OR weight >= 0),
            types TEXT NOT NULL DEFAULT '',
            abilities TEXT NOT NULL DEFAULT '',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // History Table (written on every successful fetch, never updated)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK (length(name) > 0),
            height INTEGER CHECK (height IS NULL OR height >= 0),
            weight INTEGER CHECK (weight IS NULL OR weight >= 0),
            types TEXT NOT NULL DEFAULT '',
            abilities TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_history_created_at ON history(created_at)",
        [],
    )?;

    Ok(())
}

// Fixed-width RFC 3339 so text ordering in SQLite matches time ordering
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn row_to_record(row: &Row<'_>, offset: usize) -> rusqlite::Result<SpeciesRecord> {
    let types: String = row.get(offset + 3)?;
    let abilities: String = row.get(offset + 4)?;

    Ok(SpeciesRecord {
        name: Some(row.get(offset)?),
        height: row.get(offset + 1)?,
        weight: row.get(offset + 2)?,
        types: split_list(&types),
        abilities: split_list(&abilities),
    })
}

// ============================================================================
// SQLITE STORE
// ============================================================================

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a file-backed store and initialize it
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CoachError::Storage(format!("cannot create {}: {}", parent.display(), e))
            })?;
        }

        let conn = Connection::open(path)?;
        // Other handles on the same file wait for the write lock
        conn.busy_timeout(Duration::from_secs(5))?;
        // WAL for crash recovery
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;

        let store = SqliteStore::from_connection(conn);
        store.initialize()?;
        debug!(path = %path.display(), "record store opened");
        Ok(store)
    }

    /// Volatile store, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        let store = SqliteStore::from_connection(Connection::open_in_memory()?);
        store.initialize()?;
        Ok(store)
    }

    fn from_connection(conn: Connection) -> Self {
        SqliteStore {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CoachError::Storage("database connection lock poisoned".to_string()))
    }
}

impl RecordStore for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.lock()?;
        setup_database(&conn)
    }

    fn insert_saved(&self, record: &SpeciesRecord) -> Result<i64> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO saved_records (name, height, weight, types, abilities)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                record.name,
                record.height,
                record.weight,
                join_list(&record.types),
                join_list(&record.abilities),
            ],
        )?;

        let id = conn.last_insert_rowid();
        debug!(id, name = ?record.name, "saved record inserted");
        Ok(id)
    }

    fn insert_history(&self, record: &SpeciesRecord) -> Result<HistoryEntry> {
        let mut conn = self.lock()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        // Never stamp earlier than the newest row, even if the clock stepped back
        let newest: Option<String> = tx
            .query_row("SELECT MAX(created_at) FROM history", [], |row| row.get(0))
            .optional()?
            .flatten();
        let now = format_timestamp(Utc::now());
        let stamp = match newest {
            Some(newest) if newest > now => newest,
            _ => now,
        };

        tx.execute(
            "INSERT INTO history (name, height, weight, types, abilities, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.name,
                record.height,
                record.weight,
                join_list(&record.types),
                join_list(&record.abilities),
                stamp,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        let timestamp = parse_timestamp(&stamp).ok_or_else(|| {
            CoachError::Storage(format!("unreadable history timestamp '{}'", stamp))
        })?;
        debug!(id, name = ?record.name, %stamp, "history entry inserted");

        Ok(HistoryEntry {
            id,
            timestamp,
            record: record.clone(),
        })
    }

    fn list_saved(&self) -> Result<Vec<StoredRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, height, weight, types, abilities
             FROM saved_records
             ORDER BY id ASC",
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(StoredRecord {
                    id: row.get(0)?,
                    record: row_to_record(row, 1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(records)
    }

    fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, created_at, name, height, weight, types, abilities
             FROM history
             ORDER BY created_at DESC, id DESC",
        )?;

        let rows = stmt
            .query_map([], |row| {
                let id: i64 = row.get(0)?;
                let created_at: String = row.get(1)?;
                Ok((id, created_at, row_to_record(row, 2)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, created_at, record)| -> Result<HistoryEntry> {
                let timestamp = parse_timestamp(&created_at).ok_or_else(|| {
                    CoachError::Storage(format!(
                        "history row {} has unreadable timestamp '{}'",
                        id, created_at
                    ))
                })?;
                Ok(HistoryEntry {
                    id,
                    timestamp,
                    record,
                })
            })
            .collect()
    }
}
