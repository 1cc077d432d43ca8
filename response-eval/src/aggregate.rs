//! Weighted aggregation and confidence

use serde::{Deserialize, Serialize};

use crate::metrics::{Metric, MetricSet, MetricWeights};

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Why a calculator output had to be corrected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectKind {
    OutOfRange,
    NotFinite,
}

/// A calculator output that was outside `[0, 100]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDefect {
    pub metric: Metric,
    pub kind: DefectKind,
    /// The offending value, as text so that NaN and infinities serialize
    pub raw: String,
    pub corrected: f64,
}

/// Clamp raw metric values into range, recording every correction
pub fn contain_metrics(raw: [f64; 7]) -> ([f64; 7], Vec<MetricDefect>) {
    let mut values = [0.0; 7];
    let mut defects = Vec::new();

    for metric in Metric::ALL {
        let value = raw[metric.index()];
        let (corrected, kind) = if !value.is_finite() {
            (0.0, Some(DefectKind::NotFinite))
        } else if !(0.0..=100.0).contains(&value) {
            (value.clamp(0.0, 100.0), Some(DefectKind::OutOfRange))
        } else {
            (value, None)
        };

        if let Some(kind) = kind {
            tracing::warn!(metric = %metric, raw = value, corrected, "metric out of range");
            defects.push(MetricDefect {
                metric,
                kind,
                raw: value.to_string(),
                corrected,
            });
        }
        values[metric.index()] = round1(corrected);
    }

    (values, defects)
}

/// `Σ weight · metric`, rounded to one decimal and re-clamped to `[0, 100]`
pub fn weighted_score(metrics: &MetricSet, weights: &MetricWeights) -> f64 {
    let total: f64 = weights
        .iter()
        .map(|(metric, weight)| weight * metrics.get(metric))
        .sum();
    if !total.is_finite() {
        return 0.0;
    }
    round1(total).clamp(0.0, 100.0)
}

/// Inputs of the confidence estimate
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceInputs {
    pub word_count: usize,
    pub indicator_hits: usize,
    pub repetition_penalty: f64,
    pub minimum_word_count: usize,
    pub density_target: f64,
}

/// Confidence in `[0, 100]` from response length and indicator density.
///
/// Short responses are scaled down linearly below `minimum_word_count`;
/// repetitive output loses confidence in proportion to its penalty.
pub fn confidence(inputs: ConfidenceInputs) -> f64 {
    if inputs.word_count == 0 {
        return 0.0;
    }
    let words = inputs.word_count as f64;
    let length_gate = (words / inputs.minimum_word_count.max(1) as f64).min(1.0);
    let length = (words / 500.0).min(1.0);
    let density = inputs.indicator_hits as f64 * 100.0 / words;
    let density_factor = if inputs.density_target > 0.0 {
        (density / inputs.density_target).min(1.0)
    } else {
        1.0
    };
    let repetition = 1.0 - inputs.repetition_penalty.clamp(0.0, 1.0);

    round1(100.0 * length_gate * (0.6 * length + 0.4 * density_factor) * repetition)
        .clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn equal_weights() -> MetricWeights {
        let map: IndexMap<String, f64> = Metric::ALL
            .iter()
            .map(|m| (m.as_str().to_string(), 1.0 / 7.0))
            .collect();
        MetricWeights::from_map("equal", &map).unwrap()
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(67.333), 67.3);
        assert_eq!(round1(0.05), 0.1);
        assert_eq!(round1(100.0), 100.0);
    }

    #[test]
    fn test_contain_metrics_clamps_and_records() {
        let (values, defects) =
            contain_metrics([120.0, -5.0, f64::NAN, 50.04, 0.0, 100.0, 33.33]);
        assert_eq!(values, [100.0, 0.0, 0.0, 50.0, 0.0, 100.0, 33.3]);
        assert_eq!(defects.len(), 3);
        assert_eq!(defects[0].metric, Metric::OrganizationQuality);
        assert_eq!(defects[2].kind, DefectKind::NotFinite);
        assert_eq!(defects[2].raw, "NaN");
    }

    #[test]
    fn test_weighted_score() {
        let metrics = MetricSet::from_values([70.0; 7], 100, 50.0);
        assert_eq!(weighted_score(&metrics, &equal_weights()), 70.0);

        let zero = MetricSet::zero(0);
        assert_eq!(weighted_score(&zero, &equal_weights()), 0.0);
    }

    #[test]
    fn test_confidence() {
        let base = ConfidenceInputs {
            word_count: 500,
            indicator_hits: 40,
            repetition_penalty: 0.0,
            minimum_word_count: 50,
            density_target: 8.0,
        };
        assert_eq!(confidence(base), 100.0);

        // half as dense
        assert_eq!(confidence(ConfidenceInputs { indicator_hits: 20, ..base }), 80.0);
        // looping output
        assert_eq!(confidence(ConfidenceInputs { repetition_penalty: 1.0, ..base }), 0.0);
        // below the minimum length
        let short = ConfidenceInputs { word_count: 25, indicator_hits: 2, ..base };
        assert_eq!(confidence(short), 21.5);
        assert_eq!(confidence(ConfidenceInputs { word_count: 0, ..base }), 0.0);
    }
}
