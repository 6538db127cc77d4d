//! Keyword frequency and plural/singular normalization.
//!
//! Two stages: `analyze_keywords` produces raw counts from a document, and
//! `aggregate` merges variants that `normalize` maps to the same root. The
//! second stage only needs the raw list, so any consumer of a serialized
//! report can rerun it.

use crate::text::{char_len, strip_tags, tokenize};
use crate::{KeywordEntry, NormalizedKeywordEntry};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Maximum raw keywords kept per document
pub const RAW_KEYWORD_LIMIT: usize = 50;
/// Maximum normalized keywords shown
pub const NORMALIZED_KEYWORD_LIMIT: usize = 15;
/// Tokens this short (in chars) or shorter are dropped
pub const MIN_KEYWORD_CHARS: usize = 3;

/// Common English function words excluded from keyword counts
pub const STOPWORDS: &[&str] = &[
    "the", "and", "a", "to", "of", "in", "for", "on", "with", "is", "at", "by", "an", "this",
    "that", "from", "as", "it", "are", "was", "be", "or", "which", "but", "not", "have", "has",
    "had", "you", "your", "we", "can", "will", "all", "their", "they", "if", "do", "does", "did",
    "so", "no", "yes", "our", "us",
];

/// Irregular plural → singular
pub const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("children", "child"),
    ("people", "person"),
    ("men", "man"),
    ("women", "woman"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("data", "datum"),
];

fn stopword_set() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOPWORDS.iter().copied().collect())
}

fn irregular_map() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| IRREGULAR_PLURALS.iter().copied().collect())
}

pub fn is_stopword(word: &str) -> bool {
    stopword_set().contains(word)
}

/// Raw keyword counts for an HTML document, most frequent first (top 50)
pub fn analyze_keywords(html: &str) -> Vec<KeywordEntry> {
    let text = strip_tags(html).to_lowercase();
    let mut entries = count_keywords(&text);
    entries.truncate(RAW_KEYWORD_LIMIT);
    entries
}

/// Count every keyword in already-lowercased plain text.
///
/// Ties keep the order in which words first appeared.
pub fn count_keywords(text: &str) -> Vec<KeywordEntry> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<KeywordEntry> = Vec::new();

    for token in tokenize(text) {
        if char_len(token) <= MIN_KEYWORD_CHARS || is_stopword(token) {
            continue;
        }
        match index.get(token) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(token, entries.len());
                entries.push(KeywordEntry {
                    word: token.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable: equal counts stay in first-seen order
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries
}

/// Best-effort plural → singular for English words.
///
/// Total: any string maps to a string. Rules are tried in order and the first
/// one that applies wins.
pub fn normalize(word: &str) -> String {
    if let Some(singular) = irregular_map().get(word) {
        return (*singular).to_string();
    }

    let len = char_len(word);
    if len > 3 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{}y", stem);
        }
        if let Some(stem) = word.strip_suffix("ves") {
            return format!("{}f", stem);
        }
        if ["ches", "shes", "xes", "ses"]
            .iter()
            .any(|suffix| word.ends_with(suffix))
        {
            return word[..word.len() - 2].to_string();
        }
        if len > 4 {
            if let Some(stem) = word.strip_suffix("es") {
                return stem.to_string();
            }
        }
        if !word.ends_with("ss") {
            if let Some(stem) = word.strip_suffix('s') {
                return stem.to_string();
            }
        }
    }

    word.to_string()
}

/// Merge entries whose words normalize to the same root, most frequent first.
///
/// Roots are kept in first-seen order before sorting, so ties are stable.
/// Merged counts saturate at `u32::MAX`.
pub fn aggregate(entries: &[KeywordEntry], limit: usize) -> Vec<NormalizedKeywordEntry> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut combined: Vec<NormalizedKeywordEntry> = Vec::new();

    for entry in entries {
        let root = normalize(&entry.word);
        match index.get(&root) {
            Some(&i) => combined[i].count = combined[i].count.saturating_add(entry.count),
            None => {
                index.insert(root.clone(), combined.len());
                combined.push(NormalizedKeywordEntry {
                    word: root,
                    count: entry.count,
                });
            }
        }
    }

    combined.sort_by(|a, b| b.count.cmp(&a.count));
    combined.truncate(limit);
    combined
}
