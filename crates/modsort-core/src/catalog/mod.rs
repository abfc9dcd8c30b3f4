//! Remote catalog client: site search and detail page fetch.
//!
//! Every remote call goes through the same path: a process-wide semaphore
//! bounds calls in flight, the blocking `PageFetcher` runs on tokio's
//! blocking pool under a per-call timeout, and the retry policy wraps the
//! whole attempt. A timeout counts as a transport failure and is retried
//! like one.

mod fetch;
mod results;
mod select;

pub use fetch::{CurlFetcher, PageFetcher};
pub use results::{parse_search_page, SearchEntry, SearchResult};
pub use select::{select_best_match, similarity, SelectedPage};

use anyhow::{Context, Result};
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use url::Url;

use crate::config::CatalogConfig;
use crate::encoding;
use crate::retry::{run_with_retry, RetryPolicy, TransportError};

pub struct CatalogClient {
    fetcher: Arc<dyn PageFetcher>,
    search_url: Url,
    query_param: String,
    page_link: Regex,
    retry: RetryPolicy,
    timeout: Duration,
    gate: Arc<Semaphore>,
}

impl CatalogClient {
    /// Builds a client from the `[catalog]` section. Fails only on a malformed
    /// search URL or link pattern.
    pub fn new(cfg: &CatalogConfig, retry: RetryPolicy, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let search_url = Url::parse(&cfg.search_url)
            .with_context(|| format!("invalid catalog search_url {:?}", cfg.search_url))?;
        let page_link = Regex::new(&cfg.page_link_pattern)
            .with_context(|| format!("invalid page_link_pattern {:?}", cfg.page_link_pattern))?;
        Ok(Self {
            fetcher,
            search_url,
            query_param: cfg.query_param.clone(),
            page_link,
            retry,
            timeout: cfg.request_timeout(),
            gate: Arc::new(Semaphore::new(cfg.max_concurrent_requests.max(1))),
        })
    }

    /// Search URL for `query`, with the query appended as a form parameter.
    pub fn search_url_for(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut().append_pair(&self.query_param, query);
        url
    }

    /// Runs a catalog search. An empty result is a normal outcome; an error
    /// means every attempt allowed by the retry policy failed.
    pub async fn search(&self, query: &str) -> Result<SearchResult, TransportError> {
        let url = self.search_url_for(query);
        let body = self.get_with_retry(url.as_str()).await?;
        let html = encoding::decode_page(&body);
        let result = parse_search_page(&html, &url, &self.page_link);
        tracing::debug!(query, hits = result.len(), "catalog search");
        Ok(result)
    }

    /// Fetches and decodes a detail page.
    pub async fn fetch_page(&self, page: &SearchEntry) -> Result<String, TransportError> {
        Url::parse(&page.url).map_err(|e| TransportError::InvalidUrl(format!("{}: {}", page.url, e)))?;
        let body = self.get_with_retry(&page.url).await?;
        Ok(encoding::decode_page(&body))
    }

    async fn get_with_retry(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        run_with_retry(&self.retry, move || self.get_once(url)).await
    }

    async fn get_once(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let permit = Arc::clone(&self.gate)
            .acquire_owned()
            .await
            .map_err(|e| TransportError::Worker(e.to_string()))?;
        let fetcher = Arc::clone(&self.fetcher);
        let url = url.to_string();
        // The permit moves into the worker so an abandoned (timed out) call
        // still counts against the gate until libcurl gives up on it.
        let task = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            fetcher.get(&url)
        });
        match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(res)) => res,
            Ok(Err(join)) => Err(TransportError::Worker(join.to_string())),
            Err(_) => Err(TransportError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Serves a fixed body for every URL and records how often it was called.
    struct StaticFetcher {
        body: Result<Vec<u8>, u32>,
        delay: Duration,
        calls: AtomicU32,
    }

    impl StaticFetcher {
        fn ok(body: &str) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(body.as_bytes().to_vec()),
                delay: Duration::ZERO,
                calls: AtomicU32::new(0),
            })
        }

        fn failing(status: u32) -> Arc<Self> {
            Arc::new(Self {
                body: Err(status),
                delay: Duration::ZERO,
                calls: AtomicU32::new(0),
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                body: Ok(Vec::new()),
                delay,
                calls: AtomicU32::new(0),
            })
        }
    }

    impl PageFetcher for StaticFetcher {
        fn get(&self, _url: &str) -> Result<Vec<u8>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(self.delay);
            self.body.clone().map_err(TransportError::Http)
        }
    }

    fn policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn client(fetcher: Arc<StaticFetcher>, max_attempts: u32) -> CatalogClient {
        let cfg = CatalogConfig::default();
        CatalogClient::new(&cfg, policy(max_attempts), fetcher).unwrap()
    }

    #[test]
    fn search_url_encodes_query() {
        let c = client(StaticFetcher::ok(""), 1);
        let url = c.search_url_for("Just Enough Items");
        assert_eq!(url.as_str(), "https://search.mcmod.cn/s?key=Just+Enough+Items");
        let url = c.search_url_for("物品");
        assert!(url.as_str().starts_with("https://search.mcmod.cn/s?key=%E7%89%A9"));
    }

    #[test]
    fn bad_pattern_rejected() {
        let cfg = CatalogConfig {
            page_link_pattern: "(".to_string(),
            ..CatalogConfig::default()
        };
        assert!(CatalogClient::new(&cfg, policy(1), StaticFetcher::ok("")).is_err());
    }

    #[tokio::test]
    async fn search_parses_entries() {
        let html = r#"<a href="https://www.mcmod.cn/class/1.html">Sodium</a>"#;
        let c = client(StaticFetcher::ok(html), 3);
        let res = c.search("Sodium").await.unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res.entries[0].title, "Sodium");
    }

    #[tokio::test]
    async fn server_errors_retried_up_to_max_attempts() {
        let fetcher = StaticFetcher::failing(503);
        let c = client(Arc::clone(&fetcher), 3);
        let err = c.search("Sodium").await.unwrap_err();
        assert!(matches!(err, TransportError::Http(503)));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let fetcher = StaticFetcher::failing(404);
        let c = client(Arc::clone(&fetcher), 3);
        assert!(c.search("Sodium").await.is_err());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn slow_fetch_times_out() {
        let cfg = CatalogConfig {
            request_timeout_secs: 1,
            ..CatalogConfig::default()
        };
        let fetcher = StaticFetcher::slow(Duration::from_millis(1500));
        let c = CatalogClient::new(&cfg, policy(1), fetcher).unwrap();
        let err = c.search("Sodium").await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout(_)));
    }

    #[tokio::test]
    async fn fetch_page_rejects_bad_url() {
        let c = client(StaticFetcher::ok("x"), 1);
        let entry = SearchEntry {
            title: "x".to_string(),
            url: "not a url".to_string(),
        };
        assert!(matches!(
            c.fetch_page(&entry).await,
            Err(TransportError::InvalidUrl(_))
        ));
    }
}
