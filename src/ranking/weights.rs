// ============================================================
// Ranking: Signal Weights
// ============================================================
// The composite score is a fixed weighted sum of the four
// normalised signals:
//
//   0.50 semantic + 0.25 lexical + 0.15 entity + 0.10 quality
//
// The weights come from the tuning file, never from the command
// line, and must be non-negative and sum to 1.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::section::SignalScores;

const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalWeights {
    pub semantic: f64,
    pub lexical:  f64,
    pub entity:   f64,
    pub quality:  f64,
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            semantic: 0.50,
            lexical:  0.25,
            entity:   0.15,
            quality:  0.10,
        }
    }
}

impl SignalWeights {
    /// Reject negative weights or weights that do not sum to 1.
    pub fn validate(&self) -> Result<()> {
        let all = [self.semantic, self.lexical, self.entity, self.quality];
        anyhow::ensure!(
            all.iter().all(|w| w.is_finite() && *w >= 0.0),
            "signal weights must be non-negative, got {:?}",
            self
        );
        let sum: f64 = all.iter().sum();
        anyhow::ensure!(
            (sum - 1.0).abs() <= SUM_TOLERANCE,
            "signal weights must sum to 1.0, got {sum}"
        );
        Ok(())
    }

    /// Weighted sum of already-normalised signals.
    pub fn combine(&self, normalised: &SignalScores) -> f64 {
        self.semantic * normalised.semantic
            + self.lexical * normalised.lexical
            + self.entity * normalised.entity
            + self.quality * normalised.quality
    }
}
