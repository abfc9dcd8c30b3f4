//! `modsort normalize` – show the candidate name for each file name.

use anyhow::Result;
use modsort_core::config::ModsortConfig;
use modsort_core::normalize::{CandidateName, NameNormalizer};

pub fn run_normalize(cfg: &ModsortConfig, names: &[String]) -> Result<()> {
    let normalizer = NameNormalizer::from_vocabulary(&cfg.vocabulary);
    println!(
        "{:<40} {:<28} {:<14} {:<9} {:<5} {}",
        "FILE", "NAME", "VERSION", "LOADER", "SUFFIX", "TAGS"
    );
    for raw in names {
        let c = normalizer.normalize(raw);
        println!("{}", row(raw, &c));
    }
    Ok(())
}

fn row(raw: &str, c: &CandidateName) -> String {
    format!(
        "{:<40} {:<28} {:<14} {:<9} {:<5} {}",
        raw,
        c.name,
        c.version.as_deref().unwrap_or("-"),
        c.loader.to_string(),
        format!("{:?}", c.suffix).to_lowercase(),
        c.tags.join(",")
    )
}
