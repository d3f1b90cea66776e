// 🌐 Remote Fetcher - one GET per identifier, no retries

use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

// ============================================================================
// SOURCE TRAIT
// ============================================================================

/// SpeciesSource - anything that can hand back a raw payload for an identifier
///
/// The service only depends on this trait, so tests swap in canned sources.
pub trait SpeciesSource: Send + Sync {
    /// Fetch the raw payload for an identifier
    ///
    /// # Returns
    /// * `Ok(Value)` - the provider's JSON body, untouched
    /// * `Err(FetchError::Remote)` - non-2xx, carrying the upstream status
    /// * `Err(FetchError::Transport)` - the request never got an answer
    fn fetch(&self, identifier: &str) -> Result<Value, FetchError>;

    /// Short label for logs
    fn name(&self) -> &str {
        "species-source"
    }
}

// ============================================================================
// POKEAPI CLIENT
// ============================================================================

pub struct PokeApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl PokeApiClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://pokeapi.co/api/v2/pokemon";

    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Build a client against `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(PokeApiClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `{base_url}/{identifier}`, identifier percent-encoded
    pub fn endpoint_for(&self, identifier: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(identifier))
    }
}

impl SpeciesSource for PokeApiClient {
    fn fetch(&self, identifier: &str) -> Result<Value, FetchError> {
        let url = self.endpoint_for(identifier);
        debug!(%url, "requesting species payload");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "provider returned non-success status");
            return Err(FetchError::Remote {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    fn name(&self) -> &str {
        "pokeapi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_base_and_identifier() {
        let client =
            PokeApiClient::new("https://pokeapi.co/api/v2/pokemon/", Duration::from_secs(1))
                .unwrap();

        assert_eq!(client.base_url(), "https://pokeapi.co/api/v2/pokemon");
        assert_eq!(
            client.endpoint_for("pikachu"),
            "https://pokeapi.co/api/v2/pokemon/pikachu"
        );
        assert_eq!(client.endpoint_for("25"), "https://pokeapi.co/api/v2/pokemon/25");
    }

    #[test]
    fn test_endpoint_encodes_identifier() {
        let client = PokeApiClient::new("http://localhost:9", Duration::from_secs(1)).unwrap();

        assert_eq!(
            client.endpoint_for("mr mime/../x"),
            "http://localhost:9/mr%20mime%2F..%2Fx"
        );
    }
}
