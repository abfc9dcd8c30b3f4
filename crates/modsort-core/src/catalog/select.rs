//! Choosing the search entry that best matches a query.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::results::{SearchEntry, SearchResult};

/// Scores closer than this are ties.
const TIE_EPSILON: f64 = 1e-9;

/// The chosen entry and its similarity score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectedPage {
    pub entry: SearchEntry,
    pub score: f64,
}

fn tokens(s: &str) -> Vec<String> {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Similarity in `0.0..=1.0`: the larger of how many query tokens appear in
/// the title, and the Levenshtein similarity of both strings with all
/// separators removed (`Just Enough Items` vs `JustEnoughItems`).
pub fn similarity(query: &str, title: &str) -> f64 {
    let query_tokens = tokens(query);
    let title_tokens = tokens(title);
    if query_tokens.is_empty() || title_tokens.is_empty() {
        return 0.0;
    }

    let title_set: HashSet<&str> = title_tokens.iter().map(String::as_str).collect();
    let query_set: HashSet<&str> = query_tokens.iter().map(String::as_str).collect();
    let shared = query_set.iter().filter(|t| title_set.contains(*t)).count();
    let containment = shared as f64 / query_set.len() as f64;

    let compact = strsim::normalized_levenshtein(&query_tokens.concat(), &title_tokens.concat());
    containment.max(compact)
}

fn mentions_tag(title: &str, tags: &[String]) -> bool {
    let lower = title.to_lowercase();
    tags.iter().any(|t| lower.contains(&t.to_lowercase()))
}

/// Picks the highest-scoring entry at or above `threshold`. Ties go to a title
/// mentioning one of `tags`, then the shortest title, then the earliest entry.
pub fn select_best_match(
    query: &str,
    tags: &[String],
    result: &SearchResult,
    threshold: f64,
) -> Option<SelectedPage> {
    struct Best {
        index: usize,
        score: f64,
        tagged: bool,
        len: usize,
    }

    let mut best: Option<Best> = None;
    for (index, entry) in result.entries.iter().enumerate() {
        let score = similarity(query, &entry.title);
        let tagged = mentions_tag(&entry.title, tags);
        let len = entry.title.chars().count();
        let better = match &best {
            None => true,
            Some(b) if (score - b.score).abs() >= TIE_EPSILON => score > b.score,
            Some(b) if tagged != b.tagged => tagged,
            Some(b) => len < b.len,
        };
        if better {
            best = Some(Best {
                index,
                score,
                tagged,
                len,
            });
        }
    }

    let best = best?;
    if best.score < threshold {
        tracing::debug!(query, score = best.score, threshold, "best match below threshold");
        return None;
    }
    Some(SelectedPage {
        entry: result.entries[best.index].clone(),
        score: best.score,
    })
}
