// ============================================================
// Ranking: Relevance Scorer
// ============================================================
// Computes four signals for every section of the batch, then
// normalises each signal across the batch and combines them:
//
//   semantic  oracle similarity(section text, query)
//   lexical   TF-IDF cosine to the query, relative to the best
//   entity    entities per token in the first 1000 chars
//   quality   length / structure / diversity average
//
// Steps 1 (per-section signals) run in parallel with rayon; the
// normalisation step needs every value first, so it runs after
// the parallel phase has been collected.
//
// A failing oracle call costs only that section's signal, which
// falls back to 0.0.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::query::Query;
use crate::domain::section::{ScoredSection, Section, SignalScores};
use crate::domain::traits::{EntityOracle, SemanticOracle};
use crate::ranking::lexical::{lexical_similarities, DEFAULT_MAX_FEATURES};
use crate::ranking::normalize::{min_max, DEFAULT_EPSILON};
use crate::ranking::signals::{entity_density, quality_score, QualityConfig};
use crate::ranking::weights::SignalWeights;

/// Tuning values for the scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: SignalWeights,
    /// Leading characters of a section inspected for entities
    pub entity_window: usize,
    pub quality: QualityConfig,
    /// Vocabulary cap for the TF-IDF signal
    pub lexical_max_features: usize,
    /// Added to every normalisation range
    pub epsilon: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights:              SignalWeights::default(),
            entity_window:        1000,
            quality:              QualityConfig::default(),
            lexical_max_features: DEFAULT_MAX_FEATURES,
            epsilon:              DEFAULT_EPSILON,
        }
    }
}

pub struct RelevanceScorer<'o> {
    semantic: &'o dyn SemanticOracle,
    entities: &'o dyn EntityOracle,
    config:   ScoringConfig,
}

impl<'o> RelevanceScorer<'o> {
    pub fn new(
        semantic: &'o dyn SemanticOracle,
        entities: &'o dyn EntityOracle,
        config:   ScoringConfig,
    ) -> Self {
        Self { semantic, entities, config }
    }

    /// Score every section of the batch against `query`.
    /// The result is in the same order as `sections`.
    pub fn score<'s>(&self, sections: &'s [Section], query: &Query) -> Vec<ScoredSection<'s>> {
        if sections.is_empty() {
            return Vec::new();
        }

        // ── Step 1: raw per-section signals (parallel) ───────────────────────
        let raw: Vec<(f64, f64, f64)> = sections
            .par_iter()
            .map(|section| {
                (
                    self.semantic_signal(section, query),
                    self.entity_signal(section),
                    quality_score(&section.text, &self.config.quality),
                )
            })
            .collect();

        // ── Step 2: lexical signal over the whole batch ───────────────────────
        let lexical = self.lexical_signal(sections, query);

        // ── Step 3: normalise each signal across the batch ────────────────────
        let eps      = self.config.epsilon;
        let semantic = min_max(&raw.iter().map(|r| r.0).collect::<Vec<_>>(), eps);
        let entity   = min_max(&raw.iter().map(|r| r.1).collect::<Vec<_>>(), eps);
        let quality  = min_max(&raw.iter().map(|r| r.2).collect::<Vec<_>>(), eps);
        let lex_norm = min_max(&lexical, eps);

        // ── Step 4: weighted composite ────────────────────────────────────────
        sections
            .iter()
            .enumerate()
            .map(|(i, section)| {
                let normalised = SignalScores {
                    semantic: semantic[i],
                    lexical:  lex_norm[i],
                    entity:   entity[i],
                    quality:  quality[i],
                };
                ScoredSection {
                    section,
                    signals: SignalScores {
                        semantic: raw[i].0,
                        lexical:  lexical[i],
                        entity:   raw[i].1,
                        quality:  raw[i].2,
                    },
                    composite: self.config.weights.combine(&normalised),
                }
            })
            .collect()
    }

    fn semantic_signal(&self, section: &Section, query: &Query) -> f64 {
        match self.semantic.similarity(&section.text, query.as_str()) {
            Ok(score) if score.is_finite() => score,
            Ok(score) => {
                tracing::warn!(
                    "Semantic similarity for '{}' / '{}' was {}; using 0",
                    section.document, section.title, score
                );
                0.0
            }
            Err(e) => {
                tracing::warn!(
                    "Semantic similarity failed for '{}' / '{}': {:#}; using 0",
                    section.document, section.title, e
                );
                0.0
            }
        }
    }

    fn entity_signal(&self, section: &Section) -> f64 {
        entity_density(self.entities, &section.text, Some(self.config.entity_window))
            .unwrap_or_else(|e| {
                tracing::warn!(
                    "Entity density failed for '{}' / '{}': {:#}; using 0",
                    section.document, section.title, e
                );
                0.0
            })
    }

    fn lexical_signal(&self, sections: &[Section], query: &Query) -> Vec<f64> {
        let texts: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
        match lexical_similarities(&texts, query.as_str(), self.config.lexical_max_features) {
            Ok(sims) => sims,
            Err(e) => {
                tracing::warn!("Lexical scoring failed: {:#}; using zeros for the batch", e);
                vec![0.0; sections.len()]
            }
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::testing::{FixedSemantic, PlainEntities};

    fn sections() -> Vec<Section> {
        vec![
            Section::new("a.pdf", "Beaches", "Sandy beaches line the coast near the harbour town.", 1),
            Section::new("b.pdf", "Taxes", "Quarterly filings are due at the end of each period.", 2),
        ]
    }

    #[test]
    fn test_scores_follow_input_order_and_bounds() {
        let semantic = FixedSemantic::new()
            .with_score(sections()[0].text.clone(), 0.9)
            .with_score(sections()[1].text.clone(), 0.1);
        let entities = PlainEntities::new();
        let scorer   = RelevanceScorer::new(&semantic, &entities, ScoringConfig::default());

        let batch  = sections();
        let scored = scorer.score(&batch, &Query::new("Traveller", "find beaches"));

        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].section.title, "Beaches");
        assert_eq!(scored[0].signals.semantic, 0.9);
        assert!(scored[0].composite > scored[1].composite);
        assert!(scored.iter().all(|s| (0.0..=1.0).contains(&s.composite)));
    }

    #[test]
    fn test_failing_oracle_falls_back_to_zero() {
        let batch    = sections();
        let semantic = FixedSemantic::new().with_default(0.5).failing_on(batch[1].text.clone());
        let entities = PlainEntities::new();
        let scorer   = RelevanceScorer::new(&semantic, &entities, ScoringConfig::default());

        let scored = scorer.score(&batch, &Query::new("Traveller", "anything"));
        assert_eq!(scored[0].signals.semantic, 0.5);
        assert_eq!(scored[1].signals.semantic, 0.0);
    }

    #[test]
    fn test_degenerate_vocabulary_gives_zero_lexical_signal() {
        let batch    = vec![Section::new("a", "T", "the and of", 1), Section::new("b", "U", "it is", 1)];
        let semantic = FixedSemantic::new();
        let entities = PlainEntities::new();
        let scorer   = RelevanceScorer::new(&semantic, &entities, ScoringConfig::default());

        let scored = scorer.score(&batch, &Query::new("a", "b"));
        assert!(scored.iter().all(|s| s.signals.lexical == 0.0));
    }

    #[test]
    fn test_identical_sections_score_equally() {
        let batch = vec![
            Section::new("a", "Same", "identical section body text", 1),
            Section::new("b", "Same", "identical section body text", 1),
        ];
        let semantic = FixedSemantic::new().with_default(0.3);
        let entities = PlainEntities::new().with_entities(1);
        let scorer   = RelevanceScorer::new(&semantic, &entities, ScoringConfig::default());

        let scored = scorer.score(&batch, &Query::new("p", "j"));
        assert_eq!(scored[0].composite, scored[1].composite);
        assert_eq!(scored[0].composite, 0.0);
    }

    #[test]
    fn test_entities_past_the_window_are_ignored() {
        let filler = "plain ".repeat(200);
        let batch  = vec![
            Section::new("late", "Late", format!("{filler}Paris Paris Paris"), 1),
            Section::new("early", "Early", format!("Paris Paris Paris {filler}"), 1),
        ];
        assert!(batch[0].text.chars().count() > 1000);

        let semantic = FixedSemantic::new();
        let entities = PlainEntities::new().counting("Paris");
        let scorer   = RelevanceScorer::new(&semantic, &entities, ScoringConfig::default());

        let scored = scorer.score(&batch, &Query::new("p", "j"));
        assert_eq!(scored[0].signals.entity, 0.0);
        assert!(scored[1].signals.entity > 0.0);
    }

    #[test]
    fn test_empty_batch() {
        let semantic = FixedSemantic::new();
        let entities = PlainEntities::new();
        let scorer   = RelevanceScorer::new(&semantic, &entities, ScoringConfig::default());
        assert!(scorer.score(&[], &Query::new("p", "j")).is_empty());
    }
}
