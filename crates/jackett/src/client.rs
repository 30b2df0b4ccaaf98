use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{JackettError, Result};

/// Cap on results returned from a single search
pub const MAX_SEARCH_RESULTS: usize = 50;

/// Search timeout; Jackett fans a query out to every indexer, so this is
/// deliberately generous
const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the cheap metadata endpoints
const META_TIMEOUT: Duration = Duration::from_secs(10);

/// One search hit, normalized for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub size: i64,
    pub seeders: i64,
    pub leechers: i64,
    /// Magnet URI, or the indexer's `.torrent` download link when the
    /// tracker publishes no magnet
    pub magnet: String,
    pub tracker: String,
    pub published: String,
}

/// A Jackett indexer as shown on the admin screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indexer {
    pub id: String,
    pub name: String,
    pub configured: bool,
}

/// Raw shape of Jackett's aggregate results endpoint
#[derive(Debug, Deserialize)]
struct RawResults {
    #[serde(rename = "Results", default)]
    results: Vec<RawResult>,
}

#[derive(Debug, Deserialize)]
struct RawResult {
    #[serde(rename = "Title", default)]
    title: Option<String>,
    #[serde(rename = "Size", default)]
    size: Option<i64>,
    #[serde(rename = "Seeders", default)]
    seeders: Option<i64>,
    #[serde(rename = "Peers", default)]
    peers: Option<i64>,
    #[serde(rename = "MagnetUri", default)]
    magnet_uri: Option<String>,
    #[serde(rename = "Link", default)]
    link: Option<String>,
    #[serde(rename = "Tracker", default)]
    tracker: Option<String>,
    #[serde(rename = "PublishDate", default)]
    publish_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIndexer {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    configured: bool,
}

/// Jackett API client
#[derive(Clone)]
pub struct JackettApi {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl JackettApi {
    /// Create a client for a Jackett instance
    ///
    /// # Arguments
    /// * `base_url` - Jackett address, e.g. `http://localhost:9117`
    /// * `api_key` - API key from the Jackett dashboard; `None` leaves the
    ///   client unconfigured and every call fails with `NotConfigured`
    pub fn new(base_url: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client: reqwest::Client::new(),
        }
    }

    /// Whether an API key is present
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(JackettError::NotConfigured)
    }

    /// Search all configured indexers
    ///
    /// # Arguments
    /// * `query` - Free-text search query
    /// * `category` - Optional Torznab category filter
    pub async fn search(&self, query: &str, category: Option<&str>) -> Result<Vec<SearchResult>> {
        let key = self.key()?;
        tracing::info!("Jackett search: {:?}", query);

        let mut params = vec![("apikey", key), ("Query", query)];
        if let Some(cat) = category {
            params.push(("Category[]", cat));
        }

        let response = self
            .client
            .get(format!("{}/api/v2.0/indexers/all/results", self.base_url))
            .query(&params)
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JackettError::Status(response.status().as_u16()));
        }

        let raw: RawResults = response.json().await?;
        Ok(normalize_results(raw))
    }

    /// List the indexers configured in Jackett
    pub async fn indexers(&self) -> Result<Vec<Indexer>> {
        let key = self.key()?;

        let response = self
            .client
            .get(format!("{}/api/v2.0/indexers", self.base_url))
            .query(&[("apikey", key)])
            .timeout(META_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JackettError::Status(response.status().as_u16()));
        }

        let raw: Vec<RawIndexer> = response.json().await?;
        Ok(raw
            .into_iter()
            .map(|i| Indexer {
                id: i.id.unwrap_or_default(),
                name: i.name.unwrap_or_default(),
                configured: i.configured,
            })
            .collect())
    }

    /// Probe Jackett's server config endpoint for the health check
    pub async fn ping(&self) -> Result<()> {
        let key = self.key()?;

        let response = self
            .client
            .get(format!("{}/api/v2.0/server/config", self.base_url))
            .query(&[("apikey", key)])
            .timeout(Duration::from_secs(5))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(JackettError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

fn normalize_results(raw: RawResults) -> Vec<SearchResult> {
    raw.results
        .into_iter()
        .take(MAX_SEARCH_RESULTS)
        .map(|r| {
            // Prefer the magnet; some indexers only publish a .torrent link.
            let magnet = match r.magnet_uri.filter(|m| !m.is_empty()) {
                Some(m) => m,
                None => r.link.unwrap_or_default(),
            };

            SearchResult {
                title: r.title.unwrap_or_else(|| "Untitled".to_string()),
                size: r.size.unwrap_or(0),
                seeders: r.seeders.unwrap_or(0),
                leechers: r.peers.unwrap_or(0),
                magnet,
                tracker: r.tracker.unwrap_or_else(|| "Unknown".to_string()),
                published: r.publish_date.unwrap_or_default(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<SearchResult> {
        normalize_results(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn test_normalize_full_result() {
        let results = parse(
            r#"{"Results":[{"Title":"Some.Show.S01","Size":1073741824,"Seeders":12,
                "Peers":3,"MagnetUri":"magnet:?xt=urn:btih:abc","Link":"http://x/file.torrent",
                "Tracker":"example","PublishDate":"2024-05-01T00:00:00"}]}"#,
        );

        assert_eq!(results.len(), 1);
        let r = &results[0];
        assert_eq!(r.title, "Some.Show.S01");
        assert_eq!(r.size, 1073741824);
        assert_eq!(r.seeders, 12);
        assert_eq!(r.leechers, 3);
        assert_eq!(r.magnet, "magnet:?xt=urn:btih:abc");
        assert_eq!(r.tracker, "example");
    }

    #[test]
    fn test_magnet_falls_back_to_link() {
        let results = parse(
            r#"{"Results":[{"Title":"NoMagnet","Link":"http://x/file.torrent"}]}"#,
        );
        assert_eq!(results[0].magnet, "http://x/file.torrent");

        let results = parse(
            r#"{"Results":[{"Title":"EmptyMagnet","MagnetUri":"","Link":"http://y/file.torrent"}]}"#,
        );
        assert_eq!(results[0].magnet, "http://y/file.torrent");
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let results = parse(r#"{"Results":[{}]}"#);
        let r = &results[0];
        assert_eq!(r.title, "Untitled");
        assert_eq!(r.size, 0);
        assert_eq!(r.seeders, 0);
        assert_eq!(r.tracker, "Unknown");
    }

    #[test]
    fn test_results_are_capped() {
        let one = r#"{"Title":"x"}"#;
        let many = format!(r#"{{"Results":[{}]}}"#, vec![one; 75].join(","));
        assert_eq!(parse(&many).len(), MAX_SEARCH_RESULTS);
    }

    #[test]
    fn test_empty_body() {
        assert!(parse(r#"{}"#).is_empty());
        assert!(parse(r#"{"Results":[]}"#).is_empty());
    }

    #[test]
    fn test_unconfigured_client() {
        let api = JackettApi::new("http://localhost:9117", None);
        assert!(!api.is_configured());

        let api = JackettApi::new("http://localhost:9117", Some(String::new()));
        assert!(!api.is_configured());

        let api = JackettApi::new("http://localhost:9117/", Some("key".to_string()));
        assert!(api.is_configured());
    }
}
