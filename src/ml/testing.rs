//! Test doubles for the oracles.
//!
//! Deterministic, configurable stand-ins so ranking and refinement
//! can be tested without the default heuristics shaping the result.

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::domain::traits::{EntityOracle, SemanticOracle};

/// Semantic oracle returning a fixed similarity per text.
#[derive(Default)]
pub struct FixedSemantic {
    scores: FxHashMap<String, f64>,
    default: f64,
    failing: Vec<String>,
}

impl FixedSemantic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Similarity returned for texts with no explicit score.
    pub fn with_default(mut self, default: f64) -> Self {
        self.default = default;
        self
    }

    /// Predefined similarity for an exact text.
    pub fn with_score(mut self, text: impl Into<String>, score: f64) -> Self {
        self.scores.insert(text.into(), score);
        self
    }

    /// Make similarity calls for this text fail.
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.failing.push(text.into());
        self
    }
}

impl SemanticOracle for FixedSemantic {
    fn similarity(&self, text: &str, _query: &str) -> Result<f64> {
        anyhow::ensure!(!self.failing.iter().any(|t| t == text), "oracle unavailable");
        Ok(self.scores.get(text).copied().unwrap_or(self.default))
    }
}

/// Entity oracle with whitespace tokens, a fixed entity count per
/// text (or one entity per marker word) and sentences split on ". ".
#[derive(Default)]
pub struct PlainEntities {
    entities_per_text: usize,
    marker: Option<String>,
}

impl PlainEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(mut self, count: usize) -> Self {
        self.entities_per_text = count;
        self
    }

    /// Count each whitespace word equal to `marker` as one entity.
    pub fn counting(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }
}

impl EntityOracle for PlainEntities {
    fn entity_count(&self, text: &str) -> Result<usize> {
        if text.trim().is_empty() {
            return Ok(0);
        }
        match &self.marker {
            Some(marker) => Ok(text.split_whitespace().filter(|w| *w == marker.as_str()).count()),
            None         => Ok(self.entities_per_text),
        }
    }

    fn token_count(&self, text: &str) -> Result<usize> {
        Ok(text.split_whitespace().count())
    }

    fn sentence_split(&self, text: &str) -> Result<Vec<String>> {
        Ok(text
            .split_inclusive(". ")
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect())
    }
}
