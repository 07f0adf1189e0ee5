//! Fetcher: GET `{base_url}/{category}/{id}` against the PokeAPI
//!
//! Batches overlap their network waits and are all-or-nothing: the first
//! failing request fails the whole batch.

use crate::error::{PokedexError, Result};
use crate::schema::Category;
use futures::future::try_join_all;
use reqwest::StatusCode;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2/";

/// Untyped JSON object returned for one identifier
pub type RawPayload = serde_json::Value;

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: Url,
    /// Per-request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
    pub user_agent: String,
    /// Print one `  -> category/id` line per request to stderr
    pub progress: bool,
}

impl ApiConfig {
    /// Build a config for `base_url`, normalising it to end with `/`
    pub fn new(base_url: &str) -> Result<Self> {
        let mut url = Url::parse(base_url).map_err(|e| {
            PokedexError::InvalidArgument(format!("invalid base URL '{}': {}", base_url, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(PokedexError::InvalidArgument(format!(
                "base URL '{}' cannot carry path segments",
                base_url
            )));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            base_url: url,
            timeout: None,
            user_agent: format!("pokedex/{}", env!("CARGO_PKG_VERSION")),
            progress: false,
        })
    }
}

/// HTTP client for the remote data source, shared by every batch of a run
#[derive(Debug, Clone)]
pub struct PokeApi {
    client: reqwest::Client,
    base_url: Url,
    progress: bool,
}

impl PokeApi {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|source| PokedexError::Transport {
            url: config.base_url.to_string(),
            source,
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            progress: config.progress,
        })
    }

    /// URL for one identifier; the identifier is percent-encoded as a single segment
    pub fn endpoint(&self, category: Category, id: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                PokedexError::InvalidArgument(format!(
                    "base URL '{}' cannot carry path segments",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .push(category.as_str())
            .push(id);
        Ok(url)
    }

    /// Fetch the payload for a single identifier
    pub async fn fetch_one(&self, category: Category, id: &str) -> Result<RawPayload> {
        let url = self.endpoint(category, id)?;
        if self.progress {
            eprintln!("  -> {}/{}", category, truncate(id, 60));
        }

        let transport = |source| PokedexError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(PokedexError::NotFound {
                category,
                id: id.to_string(),
            });
        }

        let response = response.error_for_status().map_err(transport)?;
        let body = response.bytes().await.map_err(transport)?;

        let payload: RawPayload = serde_json::from_slice(&body)
            .map_err(|e| PokedexError::malformed(category, id, e))?;
        if !payload.is_object() {
            return Err(PokedexError::malformed(
                category,
                id,
                "expected a JSON object",
            ));
        }

        Ok(payload)
    }

    /// Fetch payloads for every identifier concurrently, in input order
    ///
    /// A single identifier is a plain `fetch_one`. An empty list issues no
    /// request.
    pub async fn fetch_many<S: AsRef<str>>(
        &self,
        category: Category,
        ids: &[S],
    ) -> Result<Vec<RawPayload>> {
        match ids {
            [] => Ok(Vec::new()),
            [id] => Ok(vec![self.fetch_one(category, id.as_ref()).await?]),
            _ => try_join_all(ids.iter().map(|id| self.fetch_one(category, id.as_ref()))).await,
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let config = ApiConfig::new("http://localhost:8080/api/v2").unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8080/api/v2/");

        let config = ApiConfig::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ApiConfig::new("not a url"),
            Err(PokedexError::InvalidArgument(_))
        ));
        assert!(matches!(
            ApiConfig::new("mailto:someone@example.com"),
            Err(PokedexError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_endpoint() {
        let api = PokeApi::new(&ApiConfig::new(DEFAULT_BASE_URL).unwrap()).unwrap();
        assert_eq!(
            api.endpoint(Category::Move, "ice-punch").unwrap().as_str(),
            "https://pokeapi.co/api/v2/move/ice-punch"
        );
        assert_eq!(
            api.endpoint(Category::Pokemon, "151").unwrap().as_str(),
            "https://pokeapi.co/api/v2/pokemon/151"
        );
        // identifiers never add path segments
        assert_eq!(
            api.endpoint(Category::Stat, "a/b").unwrap().as_str(),
            "https://pokeapi.co/api/v2/stat/a%2Fb"
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a very long string", 10), "this is...");
    }
}
