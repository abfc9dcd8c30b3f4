//! Per-file resolution: the decision plus how it was reached.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::catalog::SelectedPage;
use crate::classify::{Classification, RequirementPair};
use crate::normalize::CandidateName;

/// Stage that ended a pipeline run early. Always routes to `unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fallback {
    /// Normalization left nothing to search for.
    EmptyName,
    /// Extension is not an archive extension; the file was never looked up.
    NotArchive,
    /// Search failed after every retry.
    SearchFailed,
    /// No search entry cleared the similarity threshold.
    NoMatch,
    /// The selected page could not be fetched after every retry.
    FetchFailed,
    /// The page had no usable requirement section.
    ParseIncomplete,
    /// The file's pipeline task panicked or was cancelled.
    TaskFailed,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Fallback::EmptyName => "empty name",
            Fallback::NotArchive => "not an archive",
            Fallback::SearchFailed => "search failed",
            Fallback::NoMatch => "no match",
            Fallback::FetchFailed => "page fetch failed",
            Fallback::ParseIncomplete => "requirements not found",
            Fallback::TaskFailed => "pipeline task failed",
        };
        f.write_str(s)
    }
}

/// Outcome of processing one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub classification: Classification,
    /// `None` when the file was classified from a catalog page.
    pub fallback: Option<Fallback>,
    pub candidate: Option<CandidateName>,
    /// Query that produced the selected page.
    pub query: Option<String>,
    pub page: Option<SelectedPage>,
    pub requirements: RequirementPair,
    /// Error text for `SearchFailed`, `FetchFailed` and `TaskFailed`.
    pub error: Option<String>,
}

impl Resolution {
    pub fn fallback(reason: Fallback) -> Self {
        Self {
            classification: Classification::Unknown,
            fallback: Some(reason),
            candidate: None,
            query: None,
            page: None,
            requirements: RequirementPair::default(),
            error: None,
        }
    }

    pub(super) fn with_candidate(mut self, candidate: CandidateName) -> Self {
        self.candidate = Some(candidate);
        self
    }

    pub(super) fn with_error(mut self, error: impl fmt::Display) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}
