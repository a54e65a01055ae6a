// ============================================================
// Layer 5: Heuristic Recognizer
// ============================================================
// Default entity oracle: counts named entities, counts tokens and
// splits text into sentences without a trained model.
//
// Entities are maximal runs of "entity-like" words:
//   - Capitalised or ALL-CAPS words   ("Old Port", "UNESCO")
//   - Words starting with a digit     ("2024", "9am")
// A single Title-case word opening a sentence is not an entity
// ("Visit the Old Port" has one entity), and a leading stop word
// is trimmed from a run ("The Louvre" counts as one entity).
//
// Sentence boundaries fall after . ! ? (plus closing quotes and
// brackets) when followed by whitespace, except after titles,
// initials and common abbreviations, or before a lowercase word.
//
//   "Dr. Smith arrived at 9 a.m. on Monday. He left."
//     → ["Dr. Smith arrived at 9 a.m. on Monday.", "He left."]

use anyhow::Result;
use std::path::Path;

use crate::data::terms::is_stop_word;
use crate::domain::traits::EntityOracle;
use crate::infra::tokenizer_store::TokenizerStore;

const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "vs", "etc", "e.g", "i.e",
    "fig", "no", "vol", "approx", "dept", "est", "inc", "ltd", "co", "corp", "ave", "rd",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    "a.m", "p.m",
];

const CLOSERS: &[char] = &['"', '\'', ')', ']', '\u{201D}', '\u{2019}'];

pub struct HeuristicRecognizer {
    tokenizer: TokenizerStore,
}

impl HeuristicRecognizer {
    pub fn new(tokenizer: TokenizerStore) -> Self {
        Self { tokenizer }
    }

    /// Use the tokenizer at `path` for token counts when given.
    pub fn with_tokenizer_file(path: Option<&Path>) -> Result<Self> {
        Ok(Self::new(TokenizerStore::load_or_default(path)?))
    }
}

impl Default for HeuristicRecognizer {
    fn default() -> Self {
        Self::new(TokenizerStore::new())
    }
}

impl EntityOracle for HeuristicRecognizer {
    fn entity_count(&self, text: &str) -> Result<usize> {
        let words = self.tokenizer.words(text)?;

        let mut count          = 0usize;
        let mut run: Vec<&str> = Vec::new();
        let mut run_at_start   = false;
        let mut sentence_start = true;

        for word in &words {
            if is_entity_like(word) {
                if run.is_empty() {
                    run_at_start = sentence_start;
                }
                run.push(word);
            } else {
                count += usize::from(is_entity_run(&run, run_at_start));
                run.clear();
            }
            sentence_start = matches!(word.as_str(), "." | "!" | "?");
        }
        count += usize::from(is_entity_run(&run, run_at_start));

        Ok(count)
    }

    fn token_count(&self, text: &str) -> Result<usize> {
        self.tokenizer.count(text)
    }

    fn sentence_split(&self, text: &str) -> Result<Vec<String>> {
        Ok(split_sentences(text))
    }
}

fn is_entity_like(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some(c) if c.is_uppercase()   => word.chars().any(char::is_alphabetic),
        _                             => false,
    }
}

fn is_all_caps(word: &str) -> bool {
    let letters: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    letters.len() >= 2 && letters.iter().all(|c| c.is_uppercase())
}

fn is_entity_run(run: &[&str], at_sentence_start: bool) -> bool {
    let mut run            = run;
    let mut opens_sentence = at_sentence_start;
    if let Some(first) = run.first() {
        if is_stop_word(first) && !is_all_caps(first) {
            run = &run[1..];
            opens_sentence = false;
        }
    }

    match run {
        [] => false,
        [only] if opens_sentence => {
            only.starts_with(|c: char| c.is_ascii_digit()) || is_all_caps(only)
        }
        _ => true,
    }
}

/// Abbreviation-aware sentence segmentation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start     = 0usize;
    let mut i         = 0usize;

    while i < chars.len() {
        let (_, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }

        // Extend over repeated terminators and closing marks
        let mut end = i + 1;
        while end < chars.len() && (matches!(chars[end].1, '.' | '!' | '?') || CLOSERS.contains(&chars[end].1)) {
            end += 1;
        }

        let at_text_end      = end >= chars.len();
        let followed_by_gap  = at_text_end || chars[end].1.is_whitespace();
        if followed_by_gap && (at_text_end || is_boundary(text, &chars, i, end)) {
            let byte_end = if at_text_end { text.len() } else { chars[end].0 };
            push_sentence(&mut sentences, &text[start..byte_end]);
            start = byte_end;
        }
        i = end;
    }

    push_sentence(&mut sentences, &text[start..]);
    sentences
}

/// Decide whether the terminator at `term` (run ending before `end`)
/// closes a sentence.
fn is_boundary(text: &str, chars: &[(usize, char)], term: usize, end: usize) -> bool {
    // The next word must not start lowercase
    let next = chars[end..].iter().map(|&(_, c)| c).find(|c| !c.is_whitespace());
    if next.is_some_and(char::is_lowercase) {
        return false;
    }

    if chars[term].1 != '.' {
        return true;
    }

    // Word immediately before the period
    let word_start = chars[..term]
        .iter()
        .rposition(|&(_, c)| c.is_whitespace() || c == '(')
        .map_or(0, |p| p + 1);
    let word = &text[chars.get(word_start).map_or(0, |&(b, _)| b)..chars[term].0];
    let lower = word.to_lowercase();

    if ABBREVIATIONS.contains(&lower.as_str()) {
        return false;
    }
    // Initials such as "J." in "J. Smith"
    let letters = word.chars().filter(|c| c.is_alphabetic()).count();
    !(letters == 1 && word.chars().all(char::is_alphabetic))
}

fn push_sentence(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}
