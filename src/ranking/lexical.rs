// ============================================================
// Ranking: Lexical Signal (TF-IDF Cosine)
// ============================================================
// Scores every section against the query with TF-IDF vectors
// fitted jointly on all sections plus the query:
//
//   1. Analyse each text into terms (see data/terms.rs)
//   2. Keep the `max_features` most frequent terms of the batch
//   3. idf(t) = ln((1 + n) / (1 + df(t))) + 1
//   4. Weight raw counts by idf, L2-normalise each vector
//   5. similarity = dot(section, query)
//   6. Divide by the best similarity in the batch
//
// So the best lexical match in a run scores 1.0. A batch whose
// texts share no terms at all has an empty vocabulary, which is an
// error the scorer turns into an all-zero signal.

use anyhow::Result;
use rustc_hash::FxHashMap;

use crate::data::terms::terms;

pub const DEFAULT_MAX_FEATURES: usize = 1000;

/// TF-IDF similarity of each text to `query`, relative to the best.
pub fn lexical_similarities(texts: &[&str], query: &str, max_features: usize) -> Result<Vec<f64>> {
    let mut docs: Vec<Vec<String>> = texts.iter().map(|t| terms(t)).collect();
    docs.push(terms(query));

    let vocabulary = build_vocabulary(&docs, max_features);
    anyhow::ensure!(
        !vocabulary.is_empty(),
        "empty vocabulary; the texts contain only stop words or no words"
    );

    // Document frequency per vocabulary term
    let n = docs.len() as f64;
    let mut df = vec![0usize; vocabulary.len()];
    for doc in &docs {
        let mut seen = vec![false; vocabulary.len()];
        for term in doc {
            if let Some(&idx) = vocabulary.get(term.as_str()) {
                if !seen[idx] {
                    seen[idx] = true;
                    df[idx] += 1;
                }
            }
        }
    }
    let idf: Vec<f64> = df
        .iter()
        .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
        .collect();

    let vectors: Vec<FxHashMap<usize, f64>> = docs
        .iter()
        .map(|doc| tfidf_vector(doc, &vocabulary, &idf))
        .collect();

    let (query_vec, section_vecs) = vectors
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("no query vector"))?;

    let sims: Vec<f64> = section_vecs.iter().map(|v| dot(v, query_vec)).collect();

    let best = sims.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scale = if best > 0.0 { best } else { 1.0 };
    Ok(sims.into_iter().map(|s| s / scale).collect())
}

/// Term → column index for the `max_features` most frequent terms.
/// Ties on frequency go to the alphabetically smaller term.
fn build_vocabulary(docs: &[Vec<String>], max_features: usize) -> FxHashMap<&str, usize> {
    let mut freq: FxHashMap<&str, usize> = FxHashMap::default();
    for term in docs.iter().flatten() {
        *freq.entry(term.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<(&str, usize)> = freq.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.truncate(max_features);

    ranked
        .into_iter()
        .enumerate()
        .map(|(idx, (term, _))| (term, idx))
        .collect()
}

fn tfidf_vector(doc: &[String], vocabulary: &FxHashMap<&str, usize>, idf: &[f64]) -> FxHashMap<usize, f64> {
    let mut vector: FxHashMap<usize, f64> = FxHashMap::default();
    for term in doc {
        if let Some(&idx) = vocabulary.get(term.as_str()) {
            *vector.entry(idx).or_insert(0.0) += 1.0;
        }
    }
    for (idx, weight) in vector.iter_mut() {
        *weight *= idf[*idx];
    }

    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.values_mut().for_each(|w| *w /= norm);
    }
    vector
}

fn dot(a: &FxHashMap<usize, f64>, b: &FxHashMap<usize, f64>) -> f64 {
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small
        .iter()
        .filter_map(|(idx, w)| large.get(idx).map(|v| w * v))
        .sum()
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_best_match_scores_one() {
        let texts = [
            "Seafood restaurants in the harbour serve fresh oysters",
            "Museum opening hours and ticket prices",
            "Harbour restaurants",
        ];
        let sims = lexical_similarities(&texts, "harbour seafood restaurants", 1000).unwrap();
        assert_eq!(sims.len(), 3);
        let best = sims.iter().copied().fold(f64::MIN, f64::max);
        assert!((best - 1.0).abs() < 1e-12);
        assert_eq!(sims[1], 0.0);
        assert!(sims.iter().all(|s| (0.0..=1.0 + 1e-12).contains(s)));
    }

    #[test]
    fn test_common_content_words_count_as_overlap() {
        let texts = [
            "Research group shares information about important work",
            "Cooking dinner with pasta",
        ];
        let sims = lexical_similarities(
            &texts,
            "Persona: Researcher. Task: find research information on group work",
            1000,
        )
        .unwrap();
        assert!((sims[0] - 1.0).abs() < 1e-12);
        assert_eq!(sims[1], 0.0);
    }

    #[test]
    fn test_no_overlap_gives_zeros() {
        let texts = ["castle tours", "wine tasting"];
        let sims = lexical_similarities(&texts, "skiing lessons", 1000).unwrap();
        assert_eq!(sims, vec![0.0, 0.0]);
    }

    #[test]
    fn test_empty_vocabulary_is_an_error() {
        let texts = ["the and of", "a an"];
        assert!(lexical_similarities(&texts, "it is", 1000).is_err());
    }

    #[test]
    fn test_max_features_limits_vocabulary() {
        let docs = vec![
            vec!["beach".to_string(), "beach".to_string(), "sand".to_string()],
            vec!["sun".to_string()],
        ];
        let vocab = build_vocabulary(&docs, 2);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.get("beach"), Some(&0));
        // "sand" and "sun" tie; the alphabetically smaller one stays
        assert_eq!(vocab.get("sand"), Some(&1));
        assert!(!vocab.contains_key("sun"));
    }
}
