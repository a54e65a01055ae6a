// ============================================================
// Layer 6: Tokenizer Store
// ============================================================
// Provides the word-level tokenisation used for token counts and
// entity spotting.
//
// Two modes:
//   - BERT pre-tokenizer (default): splits on whitespace and
//     punctuation, so "Nice, France." is 4 tokens
//   - A HuggingFace tokenizer.json supplied on the command line:
//     counts the model's own (sub-word) tokens
//
// Word splitting for entity spotting always uses the
// pre-tokenizer, since sub-word pieces carry no capitalisation
// structure.

use anyhow::Result;
use std::path::Path;
use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
use tokenizers::{OffsetReferential, OffsetType, PreTokenizedString, PreTokenizer, Tokenizer};

pub struct TokenizerStore {
    model: Option<Tokenizer>,
}

impl TokenizerStore {
    /// Pre-tokenizer only
    pub fn new() -> Self {
        Self { model: None }
    }

    /// Load a saved HuggingFace tokenizer for token counting
    pub fn load(path: &Path) -> Result<Self> {
        let tokenizer = Tokenizer::from_file(path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))?;
        tracing::info!("Loaded tokenizer from '{}'", path.display());
        Ok(Self { model: Some(tokenizer) })
    }

    /// Load from `path` when given, else use the pre-tokenizer
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None    => Ok(Self::new()),
        }
    }

    /// Whitespace- and punctuation-delimited words of `text`.
    pub fn words(&self, text: &str) -> Result<Vec<String>> {
        let mut pretokenized = PreTokenizedString::from(text);
        BertPreTokenizer
            .pre_tokenize(&mut pretokenized)
            .map_err(|e| anyhow::anyhow!("Pre-tokenisation error: {e}"))?;

        Ok(pretokenized
            .get_splits(OffsetReferential::Original, OffsetType::Char)
            .into_iter()
            .map(|(word, _, _)| word.to_string())
            .collect())
    }

    /// Number of tokens in `text`.
    pub fn count(&self, text: &str) -> Result<usize> {
        match &self.model {
            Some(tokenizer) => {
                let enc = tokenizer
                    .encode(text, false)
                    .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;
                Ok(enc.len())
            }
            None => Ok(self.words(text)?.len()),
        }
    }
}

impl Default for TokenizerStore {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_split_punctuation() {
        let store = TokenizerStore::new();
        assert_eq!(store.words("Nice, France.").unwrap(), vec!["Nice", ",", "France", "."]);
    }

    #[test]
    fn test_count_matches_words_without_model() {
        let store = TokenizerStore::new();
        assert_eq!(store.count("Visit the Old Port at 9am!").unwrap(), 7);
        assert_eq!(store.count("").unwrap(), 0);
    }

    #[test]
    fn test_load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TokenizerStore::load(&dir.path().join("tokenizer.json")).is_err());
    }
}
