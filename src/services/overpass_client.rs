// src/services/overpass_client.rs
// DOCUMENTATION: Overpass API client
// PURPOSE: Issue upstream fetches with caching and failure containment

use crate::errors::ResourceError;
use crate::models::{CreateResourceRequest, OverpassResponse};
use crate::services::cache::{FetchCache, FetchKey};
use crate::services::overpass_parser::{parse_elements, ParseOutcome};
use crate::services::overpass_query::{build_query, SearchCategory};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// User-Agent sent with every upstream request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Overpass API client
/// DOCUMENTATION: One fetch issues at most one POST to the interpreter;
/// parsed results are cached by the exact (category, lat, lon, radius)
/// tuple so an identical repeat call stays local
pub struct OverpassClient {
    /// HTTP client for making requests
    client: Client,
    /// Interpreter endpoint URL
    api_url: String,
    /// Bound on one request/response round trip
    timeout: Duration,
    /// Shared fetch result cache
    cache: Arc<FetchCache>,
}

impl OverpassClient {
    /// Create new Overpass client
    pub fn new(api_url: String, timeout_secs: u64, cache: Arc<FetchCache>) -> Self {
        Self {
            client: Client::new(),
            api_url,
            timeout: Duration::from_secs(timeout_secs),
            cache,
        }
    }

    /// Fetch resources for a category around a point
    /// DOCUMENTATION: Never fails the caller. Upstream trouble yields an
    /// empty list plus logs. Failed fetches are not cached, so a later
    /// identical call retries upstream.
    pub async fn fetch(
        &self,
        category: SearchCategory,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Vec<CreateResourceRequest> {
        let key = FetchKey::new(category, lat, lon, radius_km);

        if let Some(cached) = self.cache.get(&key).await {
            return cached;
        }

        match self.execute(category, lat, lon, radius_km).await {
            Ok(outcome) => {
                self.cache.insert(key, outcome.resources.clone()).await;
                outcome.resources
            }
            Err(e) => {
                log::error!(
                    "Overpass fetch failed for category {}: {}",
                    category.label(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// One upstream request/parse round trip
    async fn execute(
        &self,
        category: SearchCategory,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<ParseOutcome, ResourceError> {
        let query = build_query(category, lat, lon, radius_km);

        log::info!(
            "Executing Overpass query for category: {} (lat={}, lon={}, radius_km={})",
            category.label(),
            lat,
            lon,
            radius_km
        );
        log::debug!("Query: {}", query);

        let response = self
            .client
            .post(&self.api_url)
            .timeout(self.timeout)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(query)
            .send()
            .await
            .map_err(|e| ResourceError::UpstreamError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ResourceError::UpstreamError(format!(
                "API error {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ResourceError::UpstreamError(format!("Body read failed: {}", e)))?;

        // A body that is not JSON at all is an upstream failure, not an
        // empty result, and must stay out of the cache
        let parsed: OverpassResponse = serde_json::from_str(&body)
            .map_err(|e| ResourceError::UpstreamError(format!("Malformed response body: {}", e)))?;

        Ok(parse_elements(parsed.elements, category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};

    const LIBRARY_BODY: &str = r#"{"elements": [
        {"type": "node", "id": 1, "lat": 32.78, "lon": -96.8,
         "tags": {"amenity": "library", "name": "Stub Library"}}
    ]}"#;

    fn find_header_end(data: &[u8]) -> Option<usize> {
        data.windows(4).position(|w| w == b"\r\n\r\n")
    }

    /// Read one HTTP request (headers plus content-length body)
    async fn read_request(socket: &mut TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];

        loop {
            let n = match socket.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            data.extend_from_slice(&buf[..n]);

            if let Some(pos) = find_header_end(&data) {
                let headers = String::from_utf8_lossy(&data[..pos]);
                let content_length = headers
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        if name.eq_ignore_ascii_case("content-length") {
                            value.trim().parse::<usize>().ok()
                        } else {
                            None
                        }
                    })
                    .unwrap_or(0);

                if data.len() >= pos + 4 + content_length {
                    break;
                }
            }
        }
    }

    /// Minimal one-shot HTTP server counting accepted connections
    async fn spawn_stub_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            loop {
                let (mut socket, _) = match listener.accept().await {
                    Ok(conn) => conn,
                    Err(_) => break,
                };
                counter.fetch_add(1, Ordering::SeqCst);

                read_request(&mut socket).await;

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    #[tokio::test]
    async fn test_fetch_parses_upstream_elements() {
        let (url, _hits) = spawn_stub_server("200 OK", LIBRARY_BODY).await;
        let cache = Arc::new(FetchCache::new(60, 16));
        let client = OverpassClient::new(url, 5, cache);

        let resources = client.fetch(SearchCategory::Library, 32.78, -96.8, 5.0).await;

        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "Stub Library");
        assert_eq!(resources[0].type_, "LIBRARY");
        assert_eq!(resources[0].location, [-96.8, 32.78]);
    }

    #[tokio::test]
    async fn test_identical_fetch_hits_cache_not_network() {
        let (url, hits) = spawn_stub_server("200 OK", LIBRARY_BODY).await;
        let cache = Arc::new(FetchCache::new(60, 16));
        let client = OverpassClient::new(url, 5, cache);

        let first = client.fetch(SearchCategory::Library, 32.78, -96.8, 5.0).await;
        let second = client.fetch(SearchCategory::Library, 32.78, -96.8, 5.0).await;

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_changed_tuple_misses_cache() {
        let (url, hits) = spawn_stub_server("200 OK", LIBRARY_BODY).await;
        let cache = Arc::new(FetchCache::new(60, 16));
        let client = OverpassClient::new(url, 5, cache);

        client.fetch(SearchCategory::Library, 32.78, -96.8, 5.0).await;
        client.fetch(SearchCategory::Library, 32.78, -96.8, 5.004).await;

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unreachable_upstream_yields_empty_and_is_not_cached() {
        // Bind then drop so the port refuses connections
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let cache = Arc::new(FetchCache::new(60, 16));
        let client = OverpassClient::new(format!("http://{}", addr), 5, cache.clone());

        let resources = client.fetch(SearchCategory::All, 32.78, -96.8, 5.0).await;

        assert!(resources.is_empty());
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_error_status_yields_empty_and_is_not_cached() {
        let (url, hits) = spawn_stub_server("504 Gateway Timeout", "timeout").await;
        let cache = Arc::new(FetchCache::new(60, 16));
        let client = OverpassClient::new(url, 5, cache.clone());

        let resources = client.fetch(SearchCategory::Food, 32.78, -96.8, 5.0).await;

        assert!(resources.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(cache.stats().await.total_entries, 0);

        // A retry goes back upstream instead of hitting a cached failure
        client.fetch(SearchCategory::Food, 32.78, -96.8, 5.0).await;
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_garbage_body_yields_empty_and_is_not_cached() {
        let (url, _hits) = spawn_stub_server("200 OK", "<html>maintenance</html>").await;
        let cache = Arc::new(FetchCache::new(60, 16));
        let client = OverpassClient::new(url, 5, cache.clone());

        let resources = client.fetch(SearchCategory::All, 32.78, -96.8, 5.0).await;

        assert!(resources.is_empty());
        assert_eq!(cache.stats().await.total_entries, 0);
    }

    #[tokio::test]
    async fn test_empty_element_list_is_cached() {
        let (url, hits) = spawn_stub_server("200 OK", r#"{"elements": []}"#).await;
        let cache = Arc::new(FetchCache::new(60, 16));
        let client = OverpassClient::new(url, 5, cache);

        let first = client.fetch(SearchCategory::Library, 10.0, 10.0, 1.0).await;
        let second = client.fetch(SearchCategory::Library, 10.0, 10.0, 1.0).await;

        assert!(first.is_empty());
        assert!(second.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
