// ⚠️ Error Taxonomy
// Fetch failures keep the upstream status; storage and validation stay distinct
// even though the HTTP surface collapses them into one response.

use thiserror::Error;

// ============================================================================
// FETCH ERRORS
// ============================================================================

/// Failure talking to the remote species provider.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network-level failure: timeout, DNS, connection refused.
    #[error("transport error: {0}")]
    Transport(String),

    /// Provider answered with a non-2xx status.
    #[error("remote error: upstream returned HTTP {status}")]
    Remote { status: u16 },

    /// Provider answered 2xx but the body was not JSON.
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

// ============================================================================
// SERVICE ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("fetch failed: {0}")]
    FetchFailed(#[from] FetchError),

    /// Raw payload was not a JSON object.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// Backing store unavailable or write rejected.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("validation error on '{field}': {message}")]
    Validation { field: String, message: String },

    #[error("export error: {0}")]
    Export(String),
}

impl CoachError {
    pub fn validation(field: &str, message: &str) -> Self {
        CoachError::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    /// Upstream HTTP status, when the failure came from the provider.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CoachError::FetchFailed(FetchError::Remote { status }) => Some(*status),
            _ => None,
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, CoachError::Storage(_))
    }
}

impl From<rusqlite::Error> for CoachError {
    fn from(err: rusqlite::Error) -> Self {
        CoachError::Storage(err.to_string())
    }
}

impl From<csv::Error> for CoachError {
    fn from(err: csv::Error) -> Self {
        CoachError::Export(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoachError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoachError::from(FetchError::Remote { status: 404 });
        assert_eq!(
            err.to_string(),
            "fetch failed: remote error: upstream returned HTTP 404"
        );

        let err = CoachError::validation("name", "required field is missing");
        assert_eq!(
            err.to_string(),
            "validation error on 'name': required field is missing"
        );
    }

    #[test]
    fn test_status_code_only_for_remote() {
        assert_eq!(
            CoachError::from(FetchError::Remote { status: 503 }).status_code(),
            Some(503)
        );
        assert_eq!(
            CoachError::from(FetchError::Transport("refused".to_string())).status_code(),
            None
        );
        assert_eq!(CoachError::Storage("locked".to_string()).status_code(), None);
    }

    #[test]
    fn test_rusqlite_error_maps_to_storage() {
        let err: CoachError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(err.is_storage());
    }
}
