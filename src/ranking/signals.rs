// ============================================================
// Ranking: Per-Section Signals
// ============================================================
// Entity density and text quality, each computed from one text
// alone. The semantic signal comes straight from the oracle and
// the lexical signal needs the whole batch (see lexical.rs).
//
// Quality is the mean of three sub-scores in [0, 1]:
//   length      min(chars / 500, 1)
//   structure   min(mean words per "."-sentence / 15, 1)
//   diversity   unique words / total words

use anyhow::Result;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::domain::traits::EntityOracle;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Character length at which the length score saturates
    pub target_length: f64,
    /// Mean words per sentence at which the structure score saturates
    pub target_words_per_sentence: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            target_length:             500.0,
            target_words_per_sentence: 15.0,
        }
    }
}

/// Named entities per token, over at most `window` leading characters.
pub fn entity_density(oracle: &dyn EntityOracle, text: &str, window: Option<usize>) -> Result<f64> {
    let text = match window {
        Some(limit) => truncate_chars(text, limit),
        None        => text,
    };
    if text.is_empty() {
        return Ok(0.0);
    }

    let entities = oracle.entity_count(text)?;
    let tokens   = oracle.token_count(text)?;
    Ok(entities as f64 / tokens.max(1) as f64)
}

/// Average of length, structure and lexical-diversity scores.
pub fn quality_score(text: &str, config: &QualityConfig) -> f64 {
    if text.trim().is_empty() {
        return 0.0;
    }

    let chars        = text.chars().count() as f64;
    let length_score = (chars / config.target_length).min(1.0);

    let sentence_lengths: Vec<usize> = text
        .split('.')
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.split_whitespace().count())
        .collect();
    let structure_score = if sentence_lengths.is_empty() {
        0.0
    } else {
        let mean = sentence_lengths.iter().sum::<usize>() as f64 / sentence_lengths.len() as f64;
        (mean / config.target_words_per_sentence).min(1.0)
    };

    let words: Vec<&str> = text.split_whitespace().collect();
    let diversity = if words.is_empty() {
        0.0
    } else {
        let unique: FxHashSet<&str> = words.iter().copied().collect();
        unique.len() as f64 / words.len() as f64
    };

    (length_score + structure_score + diversity) / 3.0
}

/// First `limit` characters of `text`.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte, _)) => &text[..byte],
        None            => text,
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::testing::PlainEntities;

    #[test]
    fn test_quality_of_empty_text_is_zero() {
        assert_eq!(quality_score("   ", &QualityConfig::default()), 0.0);
    }

    #[test]
    fn test_quality_components() {
        // 10 chars, one 2-word sentence, 2 unique of 2 words
        let q = quality_score("alpha beta", &QualityConfig::default());
        let expected = (10.0 / 500.0 + 2.0 / 15.0 + 1.0) / 3.0;
        assert!((q - expected).abs() < 1e-12);
    }

    #[test]
    fn test_quality_saturates() {
        let sentence = (0..20).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let text     = format!("{sentence}. ").repeat(30);
        let q        = quality_score(&text, &QualityConfig::default());
        // length and structure saturate at 1; 20 unique of 600 words
        let expected = (1.0 + 1.0 + 20.0 / 600.0) / 3.0;
        assert!((q - expected).abs() < 1e-12);
    }

    #[test]
    fn test_only_periods_has_no_structure() {
        let q = quality_score("...", &QualityConfig::default());
        // 3 chars, no sentences, one unique word out of one
        let expected = (3.0 / 500.0 + 0.0 + 1.0) / 3.0;
        assert!((q - expected).abs() < 1e-12);
    }

    #[test]
    fn test_entity_density_uses_token_count() {
        let oracle = PlainEntities::new().with_entities(2);
        let d = entity_density(&oracle, "one two three four", None).unwrap();
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_entity_density_of_empty_text_is_zero() {
        let oracle = PlainEntities::new().with_entities(3);
        assert_eq!(entity_density(&oracle, "", Some(1000)).unwrap(), 0.0);
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
    }
}
