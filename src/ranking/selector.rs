// ============================================================
// Ranking: Diversity Selector
// ============================================================
// Picks the top sections with at most one section per document:
//
//   1. Stable sort by composite score, descending
//   2. Walk the sorted list, taking a section only if its
//      document has not contributed one yet
//   3. Stop after `top_k` picks or at the end of the list
//
// There is no backfill: with fewer than `top_k` distinct documents
// the selection is shorter than `top_k`.

use rustc_hash::FxHashSet;

use crate::domain::section::ScoredSection;

#[derive(Debug, Default, Clone, Copy)]
pub struct DiversitySelector;

impl DiversitySelector {
    pub fn new() -> Self {
        Self
    }

    /// Indices into `scored`, in selection order.
    /// The section at position `i` gets importance rank `i + 1`.
    pub fn select(&self, scored: &[ScoredSection<'_>], top_k: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..scored.len()).collect();
        // sort_by is stable, so ties keep batch order
        order.sort_by(|&a, &b| scored[b].composite.total_cmp(&scored[a].composite));

        let mut used: FxHashSet<&str> = FxHashSet::default();
        let mut picks = Vec::with_capacity(top_k.min(scored.len()));
        for idx in order {
            if picks.len() >= top_k {
                break;
            }
            if used.insert(scored[idx].section.document.as_str()) {
                picks.push(idx);
            }
        }

        tracing::debug!(
            "Selected {} of {} sections ({} documents used, top_k = {})",
            picks.len(),
            scored.len(),
            used.len(),
            top_k
        );
        picks
    }
}
