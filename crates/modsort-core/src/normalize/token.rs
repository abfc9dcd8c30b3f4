//! Splitting a file stem into words and recognising version tokens.

use regex::Regex;
use std::sync::LazyLock;

/// Version-like tokens. Matched against whole tokens only, so numbers inside
/// words ("3D", "F3") never count. Every dot-separated piece of a match is
/// itself either a match, a single letter, or starts with a digit.
/// Pre-release words count only with a digit ("beta2"); a bare "beta" is a
/// version only right after a numeric version, see [`is_prerelease`].
static RE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)^(?:
            (?:v|mc|r)?\d+(?:\.(?:\d+|x))+                       # 1.20.1, v1.2.3, mc1.20, 1.20.x
              (?:[ab]\d*)?                                      # 1.19.2a, 1.0.0b3
              (?:(?:alpha|beta|pre|rc|snapshot|dev|release|hotfix)\d*)?   # 5.0pre3
              (?:\.(?:alpha|beta|pre|rc|snapshot|dev|release|hotfix)\d*)* # 1.0.beta2
              (?:\.[a-z])?                                      # 0.5.1.f
          | (?:v|mc|r|a|b|build)\d+[a-z]?                       # v5, r12, mc1, build7
          | \d+                                                 # 2023
          | \d+(?:a|b|pre|rc|alpha|beta)\d*                    # 5a, 50pre3
          | (?:alpha|beta|pre|rc|snapshot|dev|release|hotfix)\d+ # beta2, rc1
        )$",
    )
    .expect("Invalid regex")
});

static RE_PRERELEASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:alpha|beta|pre|rc|snapshot|dev|release|hotfix)$").expect("Invalid regex")
});

/// A word glued to a dotted version: `forge1.20.1`, `neoforge1.21`.
static RE_PREFIXED_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{L}+)(\d+(?:\.\d+)+)$").expect("Invalid regex"));

/// `[tag]` and `【tag】` groups.
static RE_BRACKET_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\[\]]*)\]|【([^【】]*)】").expect("Invalid regex"));

pub(super) fn is_version(token: &str) -> bool {
    RE_VERSION.is_match(token)
}

/// A bare pre-release word (`beta`, `RC`, `dev`).
pub(super) fn is_prerelease(word: &str) -> bool {
    RE_PRERELEASE.is_match(word)
}

/// Splits `forge1.20.1` into (`forge`, `1.20.1`).
pub(super) fn split_prefixed_version(chunk: &str) -> Option<(&str, &str)> {
    let caps = RE_PREFIXED_VERSION.captures(chunk)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Delimiters between chunks. Dots are handled separately because they also
/// appear inside version numbers.
fn is_delimiter(c: char) -> bool {
    c != '.' && !c.is_alphanumeric()
}

/// Removes the file extension: the last dot segment, when it starts with an
/// ASCII letter, is short and alphanumeric ("jar", "zip", "litemod"), and is
/// not itself version-like ("1.0.beta" keeps its "beta").
pub(super) fn strip_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((stem, ext))
            if !stem.is_empty()
                && (2..=10).contains(&ext.len())
                && ext.starts_with(|c: char| c.is_ascii_alphabetic())
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
                && !is_version_like(ext) =>
        {
            stem
        }
        _ => name,
    }
}

/// A version token, or a word whose camel-case parts are all version or
/// pre-release tokens.
fn is_version_like(word: &str) -> bool {
    is_version(word)
        || split_camel(word)
            .into_iter()
            .all(|w| is_version(w) || is_prerelease(w))
}

/// Removes bracketed tags, returning the remainder and the trimmed tag contents.
pub(super) fn take_bracket_tags(stem: &str) -> (String, Vec<String>) {
    let mut tags = Vec::new();
    for caps in RE_BRACKET_TAG.captures_iter(stem) {
        if let Some(m) = caps.get(1).or_else(|| caps.get(2)) {
            let tag = m.as_str().trim();
            if !tag.is_empty() {
                tags.push(tag.to_string());
            }
        }
    }
    let rest = RE_BRACKET_TAG.replace_all(stem, " ").into_owned();
    (rest, tags)
}

/// Chunks separated by delimiters, with dots kept inside each chunk.
pub(super) fn chunks(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_delimiter).filter(|c| !c.is_empty())
}

/// Splits a word at case boundaries: `JustEnoughItems` → `Just Enough Items`,
/// `JEIIntegration` → `JEI Integration`. Digits never start a new word.
pub(super) fn split_camel(word: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = word.char_indices().collect();
    let mut parts = Vec::new();
    let mut start = 0;
    for i in 1..chars.len() {
        let prev = chars[i - 1].1;
        let cur = chars[i].1;
        let next_lower = chars.get(i + 1).is_some_and(|(_, c)| c.is_lowercase());
        let boundary = (prev.is_lowercase() && cur.is_uppercase())
            || (prev.is_uppercase() && cur.is_uppercase() && next_lower);
        if boundary {
            parts.push(&word[start..chars[i].0]);
            start = chars[i].0;
        }
    }
    parts.push(&word[start..]);
    parts
}

/// Title-cases a word. Short all-caps results (acronyms, ≤ 5 chars) are left
/// alone; longer all-caps results become `Xxxx`. Characters whose case mapping
/// is more than one character (`ß`, `İ`) are kept as they are, so the result
/// is a fixed point: `title_case(title_case(w)) == title_case(w)`.
pub(super) fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    let upper = first.to_uppercase();
    let head: String = if upper.len() == 1 {
        upper.collect()
    } else {
        first.to_string()
    };

    let titled = format!("{head}{rest}");
    let has_lower = titled.chars().any(char::is_lowercase);
    let has_upper = titled.chars().any(char::is_uppercase);
    if has_lower || !has_upper || titled.chars().count() <= 5 {
        return titled;
    }
    if rest.chars().any(|c| c.to_lowercase().len() != 1) {
        return titled;
    }
    let lowered: String = rest.chars().flat_map(char::to_lowercase).collect();
    head + &lowered
}
