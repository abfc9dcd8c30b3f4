//! Search result page parsing.

use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static LINKS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("Invalid selector"));

/// One search hit: the link text and the detail page it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEntry {
    pub title: String,
    pub url: String,
}

/// Entries in page order. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub entries: Vec<SearchEntry>,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Collects every link to a detail page. Hrefs are resolved against `base`
/// before matching `page_link`; the first titled link per page wins.
pub fn parse_search_page(html: &str, base: &Url, page_link: &Regex) -> SearchResult {
    let doc = Html::parse_document(html);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();

    for a in doc.select(&LINKS) {
        let Some(href) = a.value().attr("href") else {
            continue;
        };
        let Ok(url) = base.join(href.trim()) else {
            continue;
        };
        if !page_link.is_match(url.as_str()) {
            continue;
        }
        let title = collapse_whitespace(a.text());
        if title.is_empty() || seen.contains(url.as_str()) {
            continue;
        }
        seen.insert(url.as_str().to_string());
        entries.push(SearchEntry {
            title,
            url: url.into(),
        });
    }

    SearchResult { entries }
}

fn collapse_whitespace<'a>(parts: impl Iterator<Item = &'a str>) -> String {
    let joined: String = parts.collect();
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}
