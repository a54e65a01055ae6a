// ============================================================
// Ranking: Min-Max Normalisation
// ============================================================
// Rescales one signal across the batch:
//
//   norm(x) = (x - min) / (max - min + eps)
//
// eps keeps a constant signal finite: every value maps to 0.

/// Default epsilon added to the range
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Min-max normalise `values`; empty input gives an empty vector.
pub fn min_max(values: &[f64], epsilon: f64) -> Vec<f64> {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min + epsilon;

    values.iter().map(|v| (v - min) / range).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescales_to_unit_interval() {
        let n = min_max(&[2.0, 4.0, 6.0], DEFAULT_EPSILON);
        assert_eq!(n[0], 0.0);
        assert!((n[1] - 0.5).abs() < 1e-6);
        assert!((n[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_constant_signal_maps_to_zero() {
        assert_eq!(min_max(&[0.3, 0.3, 0.3], DEFAULT_EPSILON), vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_normalising_twice_is_stable() {
        let once  = min_max(&[0.0, 0.25, 1.0, 0.75], DEFAULT_EPSILON);
        let twice = min_max(&once, DEFAULT_EPSILON);
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_handles_negative_values_and_empty_input() {
        let n = min_max(&[-1.0, 1.0], DEFAULT_EPSILON);
        assert_eq!(n[0], 0.0);
        assert!((n[1] - 1.0).abs() < 1e-6);
        assert!(min_max(&[], DEFAULT_EPSILON).is_empty());
    }
}
