//! Name normalization: noisy archive filename → search-friendly mod name.
//!
//! `normalize` is a pure function of the filename and is idempotent:
//! normalizing its own output yields the same name.
//!
//! Steps: strip the extension, pull out `[tags]`, split the rest into words
//! (delimiters, dots, camel case), drop version tokens (including loader-glued
//! ones like `forge1.20.1`) and non-leading loader tokens, detach an `API`/`Lib` suffix, and title-case what remains.

mod token;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use crate::config::VocabularyConfig;

/// Mod-loading framework a file targets, as recorded from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
    Forge,
    Fabric,
    NeoForge,
    Quilt,
    Rift,
    #[default]
    None,
}

impl fmt::Display for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Loader::Forge => "Forge",
            Loader::Fabric => "Fabric",
            Loader::NeoForge => "NeoForge",
            Loader::Quilt => "Quilt",
            Loader::Rift => "Rift",
            Loader::None => "none",
        };
        f.write_str(s)
    }
}

/// Library-style suffix detached from the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixKind {
    Api,
    Lib,
    #[default]
    None,
}

/// Normalized candidate name plus the tokens stripped on the way.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CandidateName {
    pub name: String,
    /// First version-like token found, as written in the filename.
    pub version: Option<String>,
    pub loader: Loader,
    pub suffix: SuffixKind,
    /// Contents of bracketed tags; used to break ties between search results
    /// and as extra search queries.
    pub tags: Vec<String>,
}

impl CandidateName {
    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// Search queries in order of preference: the name, then each distinct tag.
    pub fn queries(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        if !self.name.is_empty() {
            out.push(&self.name);
        }
        for tag in &self.tags {
            if !out.iter().any(|q| q.eq_ignore_ascii_case(tag)) {
                out.push(tag);
            }
        }
        out
    }
}

const SUFFIXES: [(&str, &str, SuffixKind); 3] = [
    ("library", "Library", SuffixKind::Lib),
    ("api", "API", SuffixKind::Api),
    ("lib", "Lib", SuffixKind::Lib),
];

/// Minimum length of the word left in front of a glued suffix (`exampleapi`).
const MIN_GLUED_PREFIX: usize = 3;

/// Normalizer with a configurable loader vocabulary.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    loaders: HashMap<String, Loader>,
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::from_vocabulary(&VocabularyConfig::default())
    }
}

static DEFAULT_NORMALIZER: LazyLock<NameNormalizer> = LazyLock::new(NameNormalizer::default);

/// Normalizes with the built-in loader vocabulary.
pub fn normalize(raw: &str) -> CandidateName {
    DEFAULT_NORMALIZER.normalize(raw)
}

/// Tokens stripped while collecting words.
#[derive(Default)]
struct Stripped {
    version: Option<String>,
    loader: Loader,
}

impl NameNormalizer {
    pub fn from_vocabulary(vocab: &VocabularyConfig) -> Self {
        let loaders = vocab
            .loaders
            .iter()
            .map(|(k, v)| (k.to_lowercase(), *v))
            .collect();
        Self { loaders }
    }

    /// Turns a raw filename into a candidate name. Never fails; when nothing
    /// usable survives, the stem's own chunks (delimiters collapsed) are returned.
    pub fn normalize(&self, raw: &str) -> CandidateName {
        let stem = token::strip_extension(raw.trim());
        let (rest, tags) = token::take_bracket_tags(stem);
        let joined_tags = tags.join(" ");
        let mut stripped = Stripped::default();

        let mut words = self.words(&rest, &mut stripped);
        if words.is_empty() {
            words = self.words(&joined_tags, &mut stripped);
        }

        let (name, suffix) = if words.is_empty() {
            // Everything was a version token: keep the tokens themselves.
            let fallback: Vec<&str> = token::chunks(&rest)
                .chain(token::chunks(&joined_tags))
                .collect();
            (fallback.join(" "), SuffixKind::None)
        } else {
            self.assemble(&words)
        };

        CandidateName {
            name,
            version: stripped.version,
            loader: stripped.loader,
            suffix,
            tags,
        }
    }

    fn loader_of(&self, word: &str) -> Option<Loader> {
        self.loaders.get(&word.to_lowercase()).copied()
    }

    /// Collects name words, dropping versions and loader tags. A loader word is
    /// kept when nothing precedes it (`fabric-api` is the Fabric API mod). A
    /// bare pre-release word right after a version belongs to it (`1.0-beta`).
    fn words<'a>(&self, text: &'a str, stripped: &mut Stripped) -> Vec<&'a str> {
        let mut kept = Vec::new();
        let mut after_version = false;
        for chunk in token::chunks(text) {
            if token::is_version(chunk) {
                stripped.version.get_or_insert_with(|| chunk.to_string());
                after_version = true;
                continue;
            }
            if let Some((prefix, version)) = token::split_prefixed_version(chunk) {
                if let Some(loader) = self.loader_of(prefix) {
                    stripped.version.get_or_insert_with(|| version.to_string());
                    if stripped.loader == Loader::None {
                        stripped.loader = loader;
                    }
                    after_version = true;
                    continue;
                }
            }
            for piece in chunk.split('.').filter(|p| !p.is_empty()) {
                for word in token::split_camel(piece) {
                    if token::is_version(word) {
                        stripped.version.get_or_insert_with(|| word.to_string());
                        after_version = true;
                        continue;
                    }
                    if after_version && token::is_prerelease(word) {
                        continue;
                    }
                    after_version = false;
                    if let Some(loader) = self.loader_of(word) {
                        if !kept.is_empty() {
                            if stripped.loader == Loader::None {
                                stripped.loader = loader;
                            }
                            continue;
                        }
                    }
                    kept.push(word);
                }
            }
        }
        kept
    }

    /// Title-cases the words, then detaches a library suffix and re-appends it
    /// in readable form (`ExampleAPI` → `Example API`, `corelib` → `Core Lib`).
    fn assemble(&self, words: &[&str]) -> (String, SuffixKind) {
        let mut out: Vec<String> = words.iter().map(|w| token::title_case(w)).collect();
        let suffix = self.detach_suffix(&mut out);
        (out.join(" "), suffix)
    }

    fn detach_suffix(&self, out: &mut Vec<String>) -> SuffixKind {
        let Some(last) = out.last().cloned() else {
            return SuffixKind::None;
        };

        if out.len() >= 2 {
            let exact = SUFFIXES.iter().find(|(s, _, _)| last.eq_ignore_ascii_case(s));
            if let Some(&(_, form, kind)) = exact {
                out.pop();
                out.push(form.to_string());
                return kind;
            }
        }

        // Glued suffix: camel splitting found no boundary inside the word.
        if last.chars().skip(1).any(char::is_uppercase) {
            return SuffixKind::None;
        }
        for (s, form, kind) in SUFFIXES {
            let Some(cut) = last.len().checked_sub(s.len()) else {
                continue;
            };
            let (Some(prefix), Some(tail)) = (last.get(..cut), last.get(cut..)) else {
                continue;
            };
            if !tail.eq_ignore_ascii_case(s) || prefix.chars().count() < MIN_GLUED_PREFIX {
                continue;
            }
            // The prefix must survive re-normalization as a plain word.
            if token::is_version(prefix) || (out.len() > 1 && self.loader_of(prefix).is_some()) {
                return SuffixKind::None;
            }
            let prefix = prefix.to_string();
            out.pop();
            out.push(prefix);
            out.push(form.to_string());
            return kind;
        }
        SuffixKind::None
    }
}

#[cfg(test)]
mod tests;
