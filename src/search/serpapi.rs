//! SerpAPI Google Scholar Client
//!
//! Issues scholar-engine queries against SerpAPI with failover across
//! pre-configured credentials: try key 1; on non-2xx, try key 2, and so
//! on. If every key fails the error carries the last HTTP status so the
//! caller can degrade at query granularity.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::ScholarSearch;
use crate::config::SearchConfig;
use crate::types::{LoomError, ProviderError, Result, SearchHit};

const PROVIDER_NAME: &str = "serpapi";

/// SerpAPI client with secure multi-key handling
pub struct SerpApiClient {
    /// Credentials tried in order - never exposed in logs or debug output
    api_keys: Vec<SecretString>,
    endpoint: String,
    language: String,
    year_floor: u32,
    client: reqwest::Client,
}

impl std::fmt::Debug for SerpApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerpApiClient")
            .field("api_keys", &format!("[{} key(s) REDACTED]", self.api_keys.len()))
            .field("endpoint", &self.endpoint)
            .field("language", &self.language)
            .field("year_floor", &self.year_floor)
            .finish()
    }
}

impl SerpApiClient {
    pub fn new(config: &SearchConfig) -> Result<Self> {
        if config.api_keys.is_empty() {
            return Err(LoomError::Config(
                "No search credentials configured. Set search.api_keys or COURSELOOM_SEARCH__API_KEYS"
                    .to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                LoomError::provider(PROVIDER_NAME, format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            api_keys: config
                .api_keys
                .iter()
                .map(|k| SecretString::from(k.clone()))
                .collect(),
            endpoint: config.endpoint.clone(),
            language: config.language.clone(),
            year_floor: config.year_floor,
            client,
        })
    }

    async fn search_with_key(
        &self,
        query: &str,
        num_results: usize,
        api_key: &SecretString,
    ) -> Result<Vec<SearchHit>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("engine", "google_scholar"),
                ("q", query),
                ("api_key", api_key.expose_secret()),
                ("as_ylo", &self.year_floor.to_string()),
                ("hl", &self.language),
                ("num", &num_results.to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                LoomError::provider(PROVIDER_NAME, format!("Search request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::http(PROVIDER_NAME, status, body).into());
        }

        let body: ScholarResponse = response.json().await.map_err(|e| {
            LoomError::provider(PROVIDER_NAME, format!("Failed to parse search response: {}", e))
        })?;

        Ok(body
            .organic_results
            .into_iter()
            .map(OrganicResult::into_hit)
            .collect())
    }
}

#[async_trait]
impl ScholarSearch for SerpApiClient {
    async fn search(&self, query: &str, num_results: usize) -> Result<Vec<SearchHit>> {
        info!("Searching Google Scholar: {}", query);

        let mut last_error = LoomError::provider(PROVIDER_NAME, "no credentials configured");

        for (index, api_key) in self.api_keys.iter().enumerate() {
            match self.search_with_key(query, num_results, api_key).await {
                Ok(hits) => {
                    debug!(
                        "Credential {} returned {} hit(s) for '{}'",
                        index + 1,
                        hits.len(),
                        query
                    );
                    return Ok(hits);
                }
                Err(e) => {
                    warn!(
                        "Credential {}/{} failed for '{}': {}",
                        index + 1,
                        self.api_keys.len(),
                        query,
                        e
                    );
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

// Response types (SerpAPI google_scholar engine)

#[derive(Debug, Deserialize)]
struct ScholarResponse {
    #[serde(default)]
    organic_results: Vec<OrganicResult>,
}

#[derive(Debug, Deserialize)]
struct OrganicResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
    #[serde(default)]
    publication_info: Option<PublicationInfo>,
}

#[derive(Debug, Deserialize)]
struct PublicationInfo {
    #[serde(default)]
    summary: Option<String>,
}

impl OrganicResult {
    fn into_hit(self) -> SearchHit {
        SearchHit {
            title: self.title,
            link: self.link,
            snippet: self.snippet,
            publication_summary: self.publication_info.and_then(|p| p.summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_keys(keys: &[&str]) -> SearchConfig {
        SearchConfig {
            api_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_requires_at_least_one_key() {
        let err = SerpApiClient::new(&config_with_keys(&[])).unwrap_err();
        assert!(matches!(err, LoomError::Config(_)));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let client = SerpApiClient::new(&config_with_keys(&["serp-1", "serp-2"])).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("serp-1"));
        assert!(debug.contains("2 key(s) REDACTED"));
    }

    #[test]
    fn test_response_parsing() {
        let raw = r#"{
            "organic_results": [
                {"title": "Database System Concepts",
                 "link": "https://example.org/dsc",
                 "snippet": "A classic text",
                 "publication_info": {"summary": "Silberschatz - 2020"}},
                {"title": "Untitled note"}
            ]
        }"#;
        let parsed: ScholarResponse = serde_json::from_str(raw).unwrap();
        let hits: Vec<SearchHit> = parsed
            .organic_results
            .into_iter()
            .map(OrganicResult::into_hit)
            .collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].publication_summary.as_deref(), Some("Silberschatz - 2020"));
        assert!(hits[1].link.is_none());
    }

    #[test]
    fn test_empty_results_allowed() {
        let parsed: ScholarResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic_results.is_empty());
    }

    /// Minimal HTTP responder: 401 unless the request carries the good key.
    async fn spawn_stub_server(good_key: &'static str) -> String {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                let mut buf = vec![0u8; 4096];
                let n = socket.read(&mut buf).await.unwrap_or(0);
                let request = String::from_utf8_lossy(&buf[..n]).to_string();

                let response = if request.contains(&format!("api_key={}", good_key)) {
                    let body = r#"{"organic_results":[{"title":"Relational Model","link":"https://example.org/rm","snippet":"Codd","publication_info":{"summary":"Codd - 2020"}}]}"#;
                    format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    )
                } else {
                    let body = r#"{"error":"Invalid API key"}"#;
                    format!(
                        "HTTP/1.1 401 Unauthorized\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    )
                };
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_failover_to_later_key() {
        let endpoint = spawn_stub_server("serp-good").await;
        let config = SearchConfig {
            api_keys: vec![
                "serp-bad-1".to_string(),
                "serp-bad-2".to_string(),
                "serp-good".to_string(),
            ],
            endpoint,
            ..SearchConfig::default()
        };

        let client = SerpApiClient::new(&config).unwrap();
        let hits = client.search("relational databases", 5).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Relational Model");
    }

    #[tokio::test]
    async fn test_all_keys_exhausted_returns_last_error() {
        let endpoint = spawn_stub_server("serp-good").await;
        let config = SearchConfig {
            api_keys: vec!["serp-bad-1".to_string(), "serp-bad-2".to_string()],
            endpoint,
            ..SearchConfig::default()
        };

        let client = SerpApiClient::new(&config).unwrap();
        let err = client.search("relational databases", 5).await.unwrap_err();
        match err {
            LoomError::Provider(inner) => assert_eq!(inner.status, Some(401)),
            other => panic!("expected provider error, got {:?}", other),
        }
    }
}
