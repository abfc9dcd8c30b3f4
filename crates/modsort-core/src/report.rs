//! Batch report: one record per placed file plus per-bucket counts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::archive::ArchiveFile;
use crate::classify::{Classification, RequirementPair};
use crate::encoding::NameEncoding;
use crate::pipeline::{Fallback, Resolution};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub file: String,
    pub path: PathBuf,
    pub digest: String,
    pub encoding: NameEncoding,
    pub candidate: Option<String>,
    pub classification: Classification,
    /// Stage that sent the file to `unknown`; absent when classified.
    pub fallback: Option<Fallback>,
    pub query: Option<String>,
    pub page_title: Option<String>,
    pub page_url: Option<String>,
    pub score: Option<f64>,
    pub requirements: RequirementPair,
    pub error: Option<String>,
    /// Where the file was placed; absent if placement failed.
    pub destination: Option<PathBuf>,
}

impl FileRecord {
    pub fn new(file: &ArchiveFile, res: &Resolution, destination: Option<PathBuf>) -> Self {
        Self {
            file: file.display_name().into_owned(),
            path: file.path.clone(),
            digest: file.digest.clone(),
            encoding: file.encoding,
            candidate: res.candidate.as_ref().map(|c| c.name.clone()),
            classification: res.classification,
            fallback: res.fallback,
            query: res.query.clone(),
            page_title: res.page.as_ref().map(|p| p.entry.title.clone()),
            page_url: res.page.as_ref().map(|p| p.entry.url.clone()),
            score: res.page.as_ref().map(|p| p.score),
            requirements: res.requirements,
            error: res.error.clone(),
            destination,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub files: Vec<FileRecord>,
    /// Files per bucket directory name.
    pub counts: BTreeMap<String, usize>,
    /// Files left in the input because the run was stopped.
    pub not_started: usize,
    pub placement_failures: usize,
}

impl Default for BatchReport {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            counts: Classification::ALL
                .iter()
                .map(|c| (c.dir_name().to_string(), 0))
                .collect(),
            not_started: 0,
            placement_failures: 0,
        }
    }
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, record: FileRecord) {
        *self
            .counts
            .entry(record.classification.dir_name().to_string())
            .or_insert(0) += 1;
        if record.destination.is_none() {
            self.placement_failures += 1;
        }
        self.files.push(record);
    }

    /// Orders records by input path so reports from identical runs are identical.
    pub fn finish(&mut self) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn processed(&self) -> usize {
        self.files.len()
    }

    pub fn count(&self, classification: Classification) -> usize {
        self.counts
            .get(classification.dir_name())
            .copied()
            .unwrap_or(0)
    }

    pub fn fallbacks(&self) -> impl Iterator<Item = &FileRecord> {
        self.files.iter().filter(|r| r.fallback.is_some())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serialize report")
    }

    /// Writes the report as pretty JSON, creating the parent dir if needed.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        let json = self.to_json()?;
        fs::write(path, json).with_context(|| format!("write report {}", path.display()))
    }
}
