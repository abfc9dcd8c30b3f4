//! Lower-cased marker, label and value vocabularies.

use crate::classify::Requirement;
use crate::config::VocabularyConfig;

#[derive(Debug, Clone)]
pub(super) struct Vocabulary {
    markers: Vec<String>,
    client: Vec<String>,
    server: Vec<String>,
    /// Longest key first, so `无效` never loses to a shorter prefix.
    values: Vec<(String, Requirement)>,
}

fn lowered(words: &[String]) -> Vec<String> {
    words
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

impl Vocabulary {
    pub(super) fn new(cfg: &VocabularyConfig) -> Self {
        let mut values: Vec<(String, Requirement)> = cfg
            .requirements
            .iter()
            .filter(|(_, r)| r.is_known())
            .map(|(k, r)| (k.trim().to_lowercase(), *r))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        values.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()).then(a.0.cmp(&b.0)));
        Self {
            markers: lowered(&cfg.section_markers),
            client: lowered(&cfg.client_labels),
            server: lowered(&cfg.server_labels),
            values,
        }
    }

    pub(super) fn client_labels(&self) -> &[String] {
        &self.client
    }

    pub(super) fn server_labels(&self) -> &[String] {
        &self.server
    }

    pub(super) fn has_marker(&self, text: &str) -> bool {
        self.markers.iter().any(|m| text.contains(m.as_str()))
    }

    pub(super) fn has_label(&self, text: &str) -> bool {
        self.client.iter().chain(&self.server).any(|l| text.contains(l.as_str()))
    }

    /// First recognised value following any occurrence of one of `labels`.
    /// Spaces and `:`/`：` between label and value are skipped.
    pub(super) fn value_after(&self, text: &str, labels: &[String]) -> Requirement {
        labels
            .iter()
            .find_map(|label| {
                text.match_indices(label.as_str()).find_map(|(at, l)| {
                    let rest = text[at + l.len()..]
                        .trim_start_matches(|c: char| c.is_whitespace() || c == ':' || c == '：');
                    self.value_at(rest)
                })
            })
            .unwrap_or_default()
    }

    fn value_at(&self, rest: &str) -> Option<Requirement> {
        self.values
            .iter()
            .find(|(key, _)| rest.starts_with(key.as_str()))
            .map(|(_, r)| *r)
    }
}
