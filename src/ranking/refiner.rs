// ============================================================
// Ranking: Text Refiner
// ============================================================
// Compresses a section into an extractive summary.
//
// Each sentence i of n gets the unweighted sum of:
//   position     1 - (i / n) * 0.3
//   entity       entity density of the whole sentence
//   length fit   1 - |chars - 100| / 200      (unclamped, may be < 0)
//
// Sentences are then appended in score order while they fit in
// `max_length`; the first one that does not fit ends the extract.
//
//   scores [0.9, 0.8, 0.1], lengths [400, 500, 50], max 800
//     → only the first sentence (the 50-char one is never tried)

use serde::{Deserialize, Serialize};

use crate::domain::section::Section;
use crate::domain::traits::EntityOracle;
use crate::ranking::signals::entity_density;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefinerConfig {
    /// Character budget of one extract
    pub max_length: usize,
    /// Sentence length (chars) with a perfect length fit
    pub target_sentence_length: f64,
    /// Distance from the target at which length fit reaches 0
    pub length_tolerance: f64,
    /// Position score lost by the last sentence
    pub position_penalty: f64,
}

impl Default for RefinerConfig {
    fn default() -> Self {
        Self {
            max_length:             800,
            target_sentence_length: 100.0,
            length_tolerance:       200.0,
            position_penalty:       0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredSentence {
    pub text:     String,
    pub position: usize,
    pub score:    f64,
}

pub struct TextRefiner<'o> {
    entities: &'o dyn EntityOracle,
    config:   RefinerConfig,
}

impl<'o> TextRefiner<'o> {
    pub fn new(entities: &'o dyn EntityOracle, config: RefinerConfig) -> Self {
        Self { entities, config }
    }

    /// Extractive summary of `section`, at most `max_length` chars.
    pub fn refine(&self, section: &Section) -> String {
        let ranked = self.rank_sentences(section);
        assemble_extract(&ranked, self.config.max_length)
    }

    /// Sentences of the section, best first.
    pub fn rank_sentences(&self, section: &Section) -> Vec<ScoredSentence> {
        let sentences = self.entities.sentence_split(&section.text).unwrap_or_else(|e| {
            tracing::warn!(
                "Sentence split failed for '{}' / '{}': {:#}; using the whole text",
                section.document, section.title, e
            );
            vec![section.text.trim().to_string()]
        });

        let n = sentences.len();
        let mut scored: Vec<ScoredSentence> = sentences
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let score = self.position_score(i, n)
                    + self.entity_score(section, &text)
                    + self.length_fit(&text);
                ScoredSentence { text, position: i, score }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| b.text.cmp(&a.text))
        });
        scored
    }

    fn position_score(&self, i: usize, n: usize) -> f64 {
        1.0 - (i as f64 / n.max(1) as f64) * self.config.position_penalty
    }

    fn entity_score(&self, section: &Section, sentence: &str) -> f64 {
        entity_density(self.entities, sentence, None).unwrap_or_else(|e| {
            tracing::warn!(
                "Entity density failed in '{}' / '{}': {:#}; using 0",
                section.document, section.title, e
            );
            0.0
        })
    }

    fn length_fit(&self, sentence: &str) -> f64 {
        let len = sentence.chars().count() as f64;
        1.0 - (len - self.config.target_sentence_length).abs() / self.config.length_tolerance
    }
}

/// Append sentences in the given order while `result + sentence`
/// stays within `max_length` chars; stop at the first overflow.
pub fn assemble_extract(sentences: &[ScoredSentence], max_length: usize) -> String {
    let mut result = String::new();
    let mut used   = 0usize;

    for sentence in sentences {
        let len = sentence.text.chars().count();
        if used + len > max_length {
            break;
        }
        result.push_str(&sentence.text);
        result.push(' ');
        used += len + 1;
    }

    result.trim().to_string()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::testing::PlainEntities;

    fn sentence(text: String, score: f64) -> ScoredSentence {
        ScoredSentence { text, position: 0, score }
    }

    #[test]
    fn test_stops_at_first_overflow() {
        let ranked = vec![
            sentence("a".repeat(400), 0.9),
            sentence("b".repeat(500), 0.8),
            sentence("c".repeat(50), 0.1),
        ];
        let extract = assemble_extract(&ranked, 800);
        assert_eq!(extract, "a".repeat(400));
    }

    #[test]
    fn test_joins_fitting_sentences_with_spaces() {
        let ranked = vec![sentence("First one.".into(), 2.0), sentence("Second.".into(), 1.0)];
        assert_eq!(assemble_extract(&ranked, 18), "First one. Second.");
        assert_eq!(assemble_extract(&ranked, 17), "First one.");
    }

    #[test]
    fn test_oversized_first_sentence_gives_empty_extract() {
        let ranked = vec![sentence("x".repeat(900), 1.0)];
        assert_eq!(assemble_extract(&ranked, 800), "");
    }

    #[test]
    fn test_extract_never_exceeds_budget() {
        let entities = PlainEntities::new();
        let body = (0..40)
            .map(|i| format!("Sentence number {i} talks about {} things", "many ".repeat(i % 7)))
            .collect::<Vec<_>>()
            .join(". ");
        let section = Section::new("doc", "Title", body, 1);

        for max_length in [0, 1, 25, 80, 200, 800, 5000] {
            let config  = RefinerConfig { max_length, ..RefinerConfig::default() };
            let refined = TextRefiner::new(&entities, config).refine(&section);
            assert!(refined.chars().count() <= max_length);
        }
    }

    #[test]
    fn test_earlier_sentence_wins_when_otherwise_equal() {
        let entities = PlainEntities::new();
        let refiner  = TextRefiner::new(&entities, RefinerConfig::default());
        let section  = Section::new("doc", "T", "Alpha beta gamma. Delta epsilon zeta.", 1);

        let ranked = refiner.rank_sentences(&section);
        assert_eq!(ranked[0].text, "Alpha beta gamma.");
        assert_eq!(ranked[0].position, 0);
        assert!((ranked[0].score - (1.0 + 0.0 + (1.0 - 83.0 / 200.0))).abs() < 1e-12);
    }

    #[test]
    fn test_length_fit_is_not_clamped() {
        let entities = PlainEntities::new();
        let refiner  = TextRefiner::new(&entities, RefinerConfig::default());
        assert!(refiner.length_fit(&"x".repeat(600)) < 0.0);
        assert_eq!(refiner.length_fit(&"x".repeat(100)), 1.0);
    }

    #[test]
    fn test_equal_scores_order_by_text_descending() {
        let entities = PlainEntities::new();
        let refiner  = TextRefiner::new(&entities, RefinerConfig { position_penalty: 0.0, ..RefinerConfig::default() });
        let section  = Section::new("doc", "T", "Apple pies. Berry tart.", 1);

        let ranked = refiner.rank_sentences(&section);
        assert_eq!(ranked[0].text, "Berry tart.");
        assert_eq!(ranked[1].text, "Apple pies.");
    }
}
