//! `modsort extract` – requirement pair and bucket for a saved catalog page.

use anyhow::{Context, Result};
use modsort_core::classify::classify;
use modsort_core::config::ModsortConfig;
use modsort_core::encoding;
use modsort_core::extract::Extractor;
use std::fs;
use std::path::Path;

pub fn run_extract(cfg: &ModsortConfig, path: &Path) -> Result<()> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let page = encoding::decode_page(&bytes);
    let pair = Extractor::from_vocabulary(&cfg.vocabulary).extract(&page);
    println!("client: {:?}", pair.client);
    println!("server: {:?}", pair.server);
    println!("bucket: {}", classify(pair));
    Ok(())
}
