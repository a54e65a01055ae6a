// ============================================================
// Layer 5: Hashed Embedder
// ============================================================
// Default semantic oracle. Each text becomes a fixed-size vector
// by feature hashing:
//
//   word unigrams        weight 1.0
//   adjacent bigrams     weight 0.5
//   char trigrams        weight 0.25   ("#nice#" → #ni, nic, ice, ce#)
//
// Every feature is hashed to a bucket and a sign, the vector is
// L2-normalised, and similarity is the dot product of two unit
// vectors, so values lie in [-1, 1].
//
// FxHasher has no random seed, so embeddings are identical across
// runs and platforms of the same pointer width.

use anyhow::Result;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

use crate::data::terms::terms;
use crate::domain::traits::SemanticOracle;

pub const DEFAULT_DIMENSIONS: usize = 512;

const UNIGRAM_WEIGHT: f64 = 1.0;
const BIGRAM_WEIGHT:  f64 = 0.5;
const TRIGRAM_WEIGHT: f64 = 0.25;

#[derive(Debug, Clone)]
pub struct HashedEmbedder {
    dimensions: usize,
}

impl HashedEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions: dimensions.max(1) }
    }

    /// Unit-length embedding of `text` (all zeros for text with no terms).
    pub fn embed(&self, text: &str) -> Vec<f64> {
        let mut vector = vec![0.0; self.dimensions];
        let words      = terms(text);

        for word in &words {
            self.add(&mut vector, 'u', word, UNIGRAM_WEIGHT);

            let padded: Vec<char> = format!("#{word}#").chars().collect();
            for gram in padded.windows(3) {
                let gram: String = gram.iter().collect();
                self.add(&mut vector, 't', &gram, TRIGRAM_WEIGHT);
            }
        }
        for pair in words.windows(2) {
            self.add(&mut vector, 'b', &format!("{} {}", pair[0], pair[1]), BIGRAM_WEIGHT);
        }

        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }

    fn add(&self, vector: &mut [f64], kind: char, feature: &str, weight: f64) {
        let mut hasher = FxHasher::default();
        kind.hash(&mut hasher);
        feature.hash(&mut hasher);
        let hash = hasher.finish();

        let bucket = (hash % self.dimensions as u64) as usize;
        let sign   = if hash >> 63 == 0 { 1.0 } else { -1.0 };
        vector[bucket] += sign * weight;
    }
}

impl Default for HashedEmbedder {
    fn default() -> Self {
        Self::new(DEFAULT_DIMENSIONS)
    }
}

impl SemanticOracle for HashedEmbedder {
    fn similarity(&self, text: &str, query: &str) -> Result<f64> {
        Ok(cosine(&self.embed(text), &self.embed(query)))
    }
}

/// Cosine similarity of two equal-length vectors; 0 when either is all zeros.
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot    = a.iter().zip(b).map(|(x, y)| x * y).sum::<f64>();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts_are_fully_similar() {
        let e = HashedEmbedder::default();
        let s = e.similarity("coastal hiking trails", "coastal hiking trails").unwrap();
        assert!((s - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_related_text_beats_unrelated_text() {
        let e     = HashedEmbedder::default();
        let query = "Persona: Travel planner. Task: plan beach activities";
        let near  = e.similarity("Beach activities include swimming and planning boat trips", query).unwrap();
        let far   = e.similarity("Quarterly tax filings require form submissions", query).unwrap();
        assert!(near > far);
    }

    #[test]
    fn test_empty_text_has_zero_similarity() {
        let e = HashedEmbedder::default();
        assert_eq!(e.similarity("", "anything at all").unwrap(), 0.0);
    }

    #[test]
    fn test_embedding_is_unit_length_and_deterministic() {
        let e = HashedEmbedder::new(64);
        let v = e.embed("Lyon gastronomy and wine tours");
        let norm = v.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
        assert_eq!(v, e.embed("Lyon gastronomy and wine tours"));
    }

    #[test]
    fn test_cosine_bounds() {
        assert!((cosine(&[1.0, 0.0], &[-1.0, 0.0]) + 1.0).abs() < 1e-12);
        assert_eq!(cosine(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
