//! Per-file pipeline: normalize, search, select, fetch, extract, classify.
//!
//! Every stage that cannot make progress ends the run with a `Fallback`
//! and the `Unknown` bucket. `process` never fails.

mod batch;
mod provenance;

pub use batch::run_batch;
pub use provenance::{Fallback, Resolution};

use anyhow::Result;
use std::sync::Arc;
use tracing::Instrument;

use crate::archive::ArchiveFile;
use crate::catalog::{select_best_match, CatalogClient, CurlFetcher, PageFetcher};
use crate::classify::classify;
use crate::config::ModsortConfig;
use crate::extract::Extractor;
use crate::normalize::NameNormalizer;

pub struct Pipeline {
    normalizer: NameNormalizer,
    catalog: CatalogClient,
    extractor: Extractor,
    threshold: f64,
    extensions: Vec<String>,
}

impl Pipeline {
    pub fn new(cfg: &ModsortConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let catalog = CatalogClient::new(&cfg.catalog, cfg.retry.policy(), fetcher)?;
        Ok(Self {
            normalizer: NameNormalizer::from_vocabulary(&cfg.vocabulary),
            catalog,
            extractor: Extractor::from_vocabulary(&cfg.vocabulary),
            threshold: cfg.catalog.similarity_threshold,
            extensions: cfg.archive_extensions.clone(),
        })
    }

    /// Pipeline talking to the configured catalog over libcurl.
    pub fn with_curl(cfg: &ModsortConfig) -> Result<Self> {
        Self::new(cfg, Arc::new(CurlFetcher::new(&cfg.catalog)))
    }

    pub fn is_archive(&self, file: &ArchiveFile) -> bool {
        file.has_extension(&self.extensions)
    }

    /// Resolves one file to a bucket.
    pub async fn process(&self, file: &ArchiveFile) -> Resolution {
        let span = tracing::info_span!(
            "file",
            name = %file.display_name(),
            id = &file.digest[..12]
        );
        async {
            let res = self.resolve(file).await;
            match res.fallback {
                Some(reason) => tracing::info!(%reason, "unknown"),
                None => tracing::info!(bucket = %res.classification, "classified"),
            }
            res
        }
        .instrument(span)
        .await
    }

    async fn resolve(&self, file: &ArchiveFile) -> Resolution {
        if !self.is_archive(file) {
            return Resolution::fallback(Fallback::NotArchive);
        }

        let candidate = self.normalizer.normalize(&file.raw_name);
        let queries: Vec<String> = candidate.queries().into_iter().map(str::to_string).collect();
        if queries.is_empty() {
            return Resolution::fallback(Fallback::EmptyName).with_candidate(candidate);
        }
        tracing::debug!(
            name = %candidate.name,
            loader = %candidate.loader,
            version = candidate.version.as_deref().unwrap_or(""),
            "normalized"
        );

        let mut selected = None;
        for query in queries {
            let result = match self.catalog.search(&query).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(query = %query, "search failed: {}", e);
                    return Resolution::fallback(Fallback::SearchFailed)
                        .with_candidate(candidate)
                        .with_error(e);
                }
            };
            let best = select_best_match(&query, &candidate.tags, &result, self.threshold);
            if let Some(page) = best {
                tracing::debug!(
                    query = %query,
                    title = %page.entry.title,
                    score = page.score,
                    "selected"
                );
                selected = Some((query, page));
                break;
            }
        }
        let Some((query, page)) = selected else {
            return Resolution::fallback(Fallback::NoMatch).with_candidate(candidate);
        };

        let html = match self.catalog.fetch_page(&page.entry).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(url = %page.entry.url, "page fetch failed: {}", e);
                return Resolution {
                    query: Some(query),
                    page: Some(page),
                    ..Resolution::fallback(Fallback::FetchFailed)
                        .with_candidate(candidate)
                        .with_error(e)
                };
            }
        };

        let requirements = self.extractor.extract(&html);
        Resolution {
            classification: classify(requirements),
            fallback: requirements.is_unknown().then_some(Fallback::ParseIncomplete),
            candidate: Some(candidate),
            query: Some(query),
            page: Some(page),
            requirements,
            error: None,
        }
    }
}
