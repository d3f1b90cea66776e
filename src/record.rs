// 🧾 Canonical Record - flat shape shared by fetch, save and history
//
// Lists stay ordered sequences in memory. They are joined with ", " only at the
// edges (JSON output and storage columns), and either shape is accepted on input.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoachError, Result};

/// Separator used when a list field is rendered as a single string
pub const LIST_DELIMITER: &str = ", ";

/// Join an ordered list into its storage-facing string
pub fn join_list(values: &[String]) -> String {
    values.join(LIST_DELIMITER)
}

/// Split a storage-facing string back into its ordered list
///
/// The empty string is the empty list. Values that themselves contained the
/// delimiter do not survive the round trip.
pub fn split_list(joined: &str) -> Vec<String> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(LIST_DELIMITER).map(str::to_string).collect()
}

// ============================================================================
// SPECIES RECORD
// ============================================================================

/// SpeciesRecord - one normalized entity from the provider
///
/// `name` is optional so that a payload missing it still normalizes; anything
/// persisted must pass [`SpeciesRecord::validate`] first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub height: Option<u32>,

    #[serde(default)]
    pub weight: Option<u32>,

    #[serde(default, with = "delimited")]
    pub types: Vec<String>,

    #[serde(default, with = "delimited")]
    pub abilities: Vec<String>,
}

impl SpeciesRecord {
    pub fn new(name: impl Into<String>) -> Self {
        SpeciesRecord {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_abilities<I, S>(mut self, abilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.abilities = abilities.into_iter().map(Into::into).collect();
        self
    }

    pub fn types_joined(&self) -> String {
        join_list(&self.types)
    }

    pub fn abilities_joined(&self) -> String {
        join_list(&self.abilities)
    }

    /// Check the fields a persisted record must carry
    pub fn validate(&self) -> Result<()> {
        match self.name.as_deref() {
            None => Err(CoachError::validation("name", "required field is missing")),
            Some(name) if name.trim().is_empty() => {
                Err(CoachError::validation("name", "required field is empty"))
            }
            Some(_) => Ok(()),
        }
    }
}

// ============================================================================
// PERSISTED SHAPES
// ============================================================================

/// A row read back from the saved collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredRecord {
    pub id: i64,
    #[serde(flatten)]
    pub record: SpeciesRecord,
}

/// A row read back from the history collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub record: SpeciesRecord,
}

/// Serde adapter: write lists joined, read either a joined string or an array.
mod delimited {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ListOrJoined {
        List(Vec<String>),
        Joined(String),
    }

    pub fn serialize<S>(values: &[String], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::join_list(values))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<ListOrJoined>::deserialize(deserializer)? {
            Some(ListOrJoined::List(values)) => values,
            Some(ListOrJoined::Joined(joined)) => super::split_list(&joined),
            None => Vec::new(),
        })
    }
}
