//! Requirement extraction from a catalog detail page.
//!
//! The requirement section is found structurally: the innermost element whose
//! text mentions a section marker, widened to at most `MAX_CLIMB` ancestors
//! until it contains a client or server label. Missing sections, missing
//! labels and unrecognised values all come out as `Requirement::Unknown`.

mod vocab;

use scraper::{ElementRef, Html};

use crate::classify::RequirementPair;
use crate::config::VocabularyConfig;

use vocab::Vocabulary;

const MAX_CLIMB: usize = 3;

#[derive(Debug, Clone)]
pub struct Extractor {
    vocab: Vocabulary,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::from_vocabulary(&VocabularyConfig::default())
    }
}

impl Extractor {
    pub fn from_vocabulary(cfg: &VocabularyConfig) -> Self {
        Self {
            vocab: Vocabulary::new(cfg),
        }
    }

    /// Parses a page into a requirement pair. Never fails.
    pub fn extract(&self, page: &str) -> RequirementPair {
        let doc = Html::parse_document(page);
        for marked in self.innermost_marked(&doc) {
            if let Some(section) = self.widen_to_fields(marked) {
                let pair = RequirementPair::new(
                    self.vocab.value_after(&section, self.vocab.client_labels()),
                    self.vocab.value_after(&section, self.vocab.server_labels()),
                );
                tracing::trace!(?pair, "requirement section found");
                return pair;
            }
        }
        tracing::debug!("no requirement section on page");
        RequirementPair::default()
    }

    /// Elements that mention a section marker while none of their child
    /// elements do, in document order.
    fn innermost_marked<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        doc.root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| self.vocab.has_marker(&lower_text(el)))
            .filter(|el| {
                !el.children()
                    .filter_map(ElementRef::wrap)
                    .any(|child| self.vocab.has_marker(&lower_text(&child)))
            })
            .collect()
    }

    /// Lower-cased text of the first element, starting at `el` and climbing
    /// at most `MAX_CLIMB` ancestors, that carries a client or server label.
    fn widen_to_fields(&self, el: ElementRef<'_>) -> Option<String> {
        let mut current = el;
        for _ in 0..=MAX_CLIMB {
            let text = lower_text(&current);
            if self.vocab.has_label(&text) {
                return Some(text);
            }
            current = current.parent().and_then(ElementRef::wrap)?;
        }
        None
    }
}

/// Convenience wrapper using the built-in vocabulary.
pub fn extract(page: &str) -> RequirementPair {
    Extractor::default().extract(page)
}

fn lower_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().to_lowercase()
}
