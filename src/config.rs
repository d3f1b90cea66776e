// ⚙️ Configuration - environment first, optional .env file
//
// No credentials live in code; everything comes from the process environment.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CoachError, Result};
use crate::fetcher::PokeApiClient;

pub const ENV_BASE_URL: &str = "POKEAPI_BASE_URL";
pub const ENV_DB_PATH: &str = "COACH_DB_PATH";
pub const ENV_HTTP_TIMEOUT_SECS: &str = "COACH_HTTP_TIMEOUT_SECS";
pub const ENV_BIND_ADDR: &str = "COACH_BIND_ADDR";

pub const DEFAULT_DB_PATH: &str = "coach.db";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoachConfig {
    /// Provider endpoint; identifiers are appended as the last path segment
    pub base_url: String,
    /// SQLite database file
    pub db_path: PathBuf,
    /// Per-request timeout for the provider
    pub http_timeout: Duration,
    /// Listen address for the HTTP server
    pub bind_addr: String,
}

impl Default for CoachConfig {
    fn default() -> Self {
        CoachConfig {
            base_url: PokeApiClient::DEFAULT_BASE_URL.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            http_timeout: PokeApiClient::DEFAULT_TIMEOUT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl CoachConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> Result<Self> {
        accept_env_file(dotenvy::dotenv())?;
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset or blank keys keep defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = CoachConfig::default();

        if let Some(base_url) = get(ENV_BASE_URL) {
            config.base_url = base_url.trim().to_string();
        }
        if let Some(db_path) = get(ENV_DB_PATH) {
            config.db_path = PathBuf::from(db_path);
        }
        if let Some(raw) = get(ENV_HTTP_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                let message = format!("expected whole seconds, got '{}'", raw);
                CoachError::validation(ENV_HTTP_TIMEOUT_SECS, &message)
            })?;
            if secs == 0 {
                return Err(CoachError::validation(
                    ENV_HTTP_TIMEOUT_SECS,
                    "must be greater than zero",
                ));
            }
            config.http_timeout = Duration::from_secs(secs);
        }
        if let Some(bind_addr) = get(ENV_BIND_ADDR) {
            config.bind_addr = bind_addr.trim().to_string();
        }

        Ok(config)
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }
}

/// A missing `.env` is normal; one that exists but cannot be read or parsed is not
fn accept_env_file<T>(loaded: std::result::Result<T, dotenvy::Error>) -> Result<()> {
    match loaded {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CoachError::validation(".env", &e.to_string())),
    }
}
