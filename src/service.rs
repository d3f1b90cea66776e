// 🧭 Record Service - fetch → normalize → history, plus save and listings
//
// Dependencies are handed in at construction; nothing here is global.

use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{CoachError, Result};
use crate::fetcher::SpeciesSource;
use crate::normalizer::normalize;
use crate::record::{HistoryEntry, SpeciesRecord, StoredRecord};
use crate::store::RecordStore;

pub struct RecordService {
    source: Arc<dyn SpeciesSource>,
    store: Arc<dyn RecordStore>,
}

impl RecordService {
    pub fn new(source: Arc<dyn SpeciesSource>, store: Arc<dyn RecordStore>) -> Self {
        RecordService { source, store }
    }

    /// Fetch an identifier, normalize it and record it in history
    ///
    /// History is auxiliary: a failed history write is logged and the fetched
    /// record is still returned. Fetch failures write nothing.
    #[instrument(skip(self))]
    pub fn fetch_and_record(&self, identifier: &str) -> Result<SpeciesRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(CoachError::validation("identifier", "must not be empty"));
        }

        let raw = self.source.fetch(identifier).map_err(|err| {
            warn!(source = self.source.name(), error = %err, "fetch failed");
            CoachError::FetchFailed(err)
        })?;

        let record = normalize(&raw)?;

        match self.store.insert_history(&record) {
            Ok(entry) => debug!(history_id = entry.id, "history recorded"),
            Err(err) => {
                warn!(error = %err, "history write failed, returning fetched record anyway")
            }
        }

        info!(name = ?record.name, "species fetched");
        Ok(record)
    }

    /// Persist a record into the saved collection
    ///
    /// Validation happens before the store is touched.
    #[instrument(skip(self, record), fields(name = ?record.name))]
    pub fn save(&self, record: &SpeciesRecord) -> Result<i64> {
        record.validate()?;
        let id = self.store.insert_saved(record)?;
        info!(id, "record saved");
        Ok(id)
    }

    pub fn list_saved(&self) -> Result<Vec<StoredRecord>> {
        self.store.list_saved()
    }

    pub fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        self.store.list_history()
    }
}
