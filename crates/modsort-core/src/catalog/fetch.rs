//! Page transport: a blocking GET capability the catalog client depends on.

use std::time::Duration;

use crate::config::CatalogConfig;
use crate::retry::TransportError;

/// Fetches the body of a URL. Implementations block; the catalog client runs
/// them on the blocking pool with its own timeout and concurrency gate.
pub trait PageFetcher: Send + Sync {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// libcurl-backed fetcher. Follows redirects and requires a 2xx response.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    connect_timeout: Duration,
    timeout: Duration,
    user_agent: String,
}

impl CurlFetcher {
    pub fn new(cfg: &CatalogConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            timeout: cfg.request_timeout(),
            user_agent: cfg.user_agent.clone(),
        }
    }
}

impl PageFetcher for CurlFetcher {
    fn get(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let mut body = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(5)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(&self.user_agent)?;
        // Empty string: accept every encoding libcurl can decode.
        easy.accept_encoding("")?;

        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransportError::Http(code));
        }
        tracing::trace!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
