// ============================================================
// Layer 4: Term Analyzer
// ============================================================
// Shared word analysis for the lexical signal and the hashed
// embedder: lowercase, keep runs of two or more word characters,
// drop English stop words.
//
// The stop list is NLTK's short English list (about 180 words),
// close to what TF-IDF tooling usually drops. Content words such
// as "research", "information" or "work" are kept.
//
// Example:
//   "The 2 sunny beaches of Marseille!" → ["sunny", "beaches", "marseille"]

use regex::Regex;
use rustc_hash::FxHashSet;
use std::sync::LazyLock;
use stop_words::{get, LANGUAGE};

static TERM_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w\w+\b").expect("valid term regex"));

static ENGLISH_STOP_WORDS: LazyLock<FxHashSet<String>> = LazyLock::new(|| {
    get(LANGUAGE::English)
        .iter()
        .map(|s| s.to_string().to_lowercase())
        .collect()
});

/// Lowercased, stop-word-free terms of `text` in order.
pub fn terms(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    TERM_REGEX
        .find_iter(&lower)
        .map(|m| m.as_str())
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

/// Case-insensitive English stop word check.
pub fn is_stop_word(word: &str) -> bool {
    ENGLISH_STOP_WORDS.contains(&word.to_lowercase())
}
