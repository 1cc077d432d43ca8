//! Lexical coherence estimation
//!
//! Coherence is approximated from word overlap: between consecutive
//! sentences (flow), between topic segments (consistency), between sliding
//! term-frequency windows (drift) and between nearby sentence pairs.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::TextSample;

const IDEAL_LOW: f64 = 0.2;
const IDEAL_HIGH: f64 = 0.7;
const SEGMENT: usize = 100;
const DRIFT_WINDOW: usize = 100;
const DRIFT_STEP: usize = 50;
/// Sentence pairs further apart than this are not compared
const PAIR_DISTANCE: usize = 5;

const STOP_WORDS: &[&str] = &[
    "about", "above", "after", "again", "also", "been", "before", "being", "both", "could",
    "does", "doing", "each", "from", "have", "having", "here", "into", "itself", "just", "more",
    "most", "much", "only", "other", "over", "same", "should", "some", "such", "than", "that",
    "their", "them", "then", "there", "these", "they", "this", "those", "through", "very",
    "were", "what", "when", "where", "which", "while", "will", "with", "would", "your",
];

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CoherenceReport {
    /// Jaccard similarity of each consecutive sentence pair
    pub transitions: Vec<f64>,
    pub transition_quality: f64,
    pub narrative: f64,
    pub flow: f64,
    pub topic_consistency: f64,
    pub drift_stability: f64,
    pub cross_sentence: f64,
    pub overall: f64,
}

fn jaccard<T: Ord>(a: &BTreeSet<T>, b: &BTreeSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let shared = a.intersection(b).count();
    shared as f64 / (a.len() + b.len() - shared) as f64
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

fn sentence_words(sentence: &str) -> BTreeSet<String> {
    sentence
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|w| w.len() > 1)
        .map(|w| w.to_ascii_lowercase())
        .collect()
}

/// Score for one transition; 1.0 inside the ideal overlap band
fn transition_score(similarity: f64) -> f64 {
    if similarity < IDEAL_LOW {
        similarity / IDEAL_LOW
    } else if similarity > IDEAL_HIGH {
        (1.0 - similarity) / (1.0 - IDEAL_HIGH)
    } else {
        1.0
    }
}

fn nearby_pairs_mean<T: Ord>(sets: &[BTreeSet<T>]) -> f64 {
    let mut similarities = Vec::new();
    for i in 0..sets.len() {
        for j in (i + 1)..sets.len().min(i + 1 + PAIR_DISTANCE) {
            similarities.push(jaccard(&sets[i], &sets[j]));
        }
    }
    mean(&similarities)
}

fn cosine(a: &BTreeMap<&str, f64>, b: &BTreeMap<&str, f64>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(k, va)| b.get(k).map(|vb| va * vb))
        .sum();
    let norm_a = a.values().map(|v| v * v).sum::<f64>().sqrt();
    let norm_b = b.values().map(|v| v * v).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

fn term_frequencies(tokens: &[String]) -> BTreeMap<&str, f64> {
    let mut tf = BTreeMap::new();
    for token in tokens {
        *tf.entry(token.as_str()).or_insert(0.0) += 1.0;
    }
    tf
}

impl CoherenceReport {
    pub fn analyze(sample: &TextSample<'_>) -> Self {
        if sample.is_blank() {
            return Self::default();
        }

        let sentence_sets: Vec<BTreeSet<String>> = sample
            .sentences()
            .iter()
            .map(|s| sentence_words(s))
            .collect();

        let transitions: Vec<f64> = sentence_sets
            .windows(2)
            .map(|pair| jaccard(&pair[0], &pair[1]))
            .collect();

        let stats = sample.statistics();
        let (transition_quality, narrative, cross_sentence) = if transitions.is_empty() {
            (1.0, 1.0, 1.0)
        } else {
            let quality = mean(
                &transitions
                    .iter()
                    .map(|t| transition_score(*t))
                    .collect::<Vec<_>>(),
            );
            let narrative = 0.4 * (1.0 - std_dev(&transitions))
                + 0.4 * mean(&transitions)
                + 0.2 * (stats.avg_sentence_length / 10.0).min(1.0);
            (quality, narrative, nearby_pairs_mean(&sentence_sets))
        };
        let flow = (transition_quality + narrative) / 2.0;

        let tokens = sample.tokens();
        let topic_consistency = if tokens.len() < 2 * SEGMENT {
            1.0
        } else {
            let segments: Vec<BTreeSet<&str>> = tokens
                .chunks(SEGMENT)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(String::as_str)
                        .filter(|w| w.len() > 3 && !STOP_WORDS.contains(w))
                        .collect()
                })
                .collect();
            nearby_pairs_mean(&segments)
        };

        let drift_stability = if tokens.len() < DRIFT_WINDOW + DRIFT_STEP {
            1.0
        } else {
            let windows: Vec<BTreeMap<&str, f64>> = (0..=tokens.len() - DRIFT_WINDOW)
                .step_by(DRIFT_STEP)
                .map(|start| term_frequencies(&tokens[start..start + DRIFT_WINDOW]))
                .collect();
            let similarities: Vec<f64> = windows
                .windows(2)
                .map(|pair| cosine(&pair[0], &pair[1]))
                .collect();
            (1.0 - std_dev(&similarities)).clamp(0.0, 1.0)
        };

        let overall = (0.3 * flow
            + 0.3 * drift_stability
            + 0.2 * topic_consistency
            + 0.2 * cross_sentence)
            .clamp(0.0, 1.0);

        Self {
            transitions,
            transition_quality,
            narrative,
            flow,
            topic_consistency,
            drift_stability,
            cross_sentence,
            overall,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_scores_zero() {
        let report = CoherenceReport::analyze(&TextSample::new(""));
        assert_eq!(report.overall, 0.0);
    }

    #[test]
    fn test_single_sentence_is_neutral() {
        let report = CoherenceReport::analyze(&TextSample::new("Restart the web server now"));
        assert_eq!(report.flow, 1.0);
        assert!(report.transitions.is_empty());
        assert!((report.overall - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_transition_band() {
        assert_eq!(transition_score(0.5), 1.0);
        assert!((transition_score(0.1) - 0.5).abs() < 1e-12);
        assert!((transition_score(0.85) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_pair_mean_ignores_distant_pairs() {
        let sets = |words: &[&'static str]| -> Vec<BTreeSet<&'static str>> {
            words.iter().map(|w| BTreeSet::from([*w])).collect()
        };

        let close = nearby_pairs_mean(&sets(&["alpha", "beta", "alpha"]));
        assert!((close - 1.0 / 3.0).abs() < 1e-12);

        // the only overlapping pair is six sentences apart
        let far = nearby_pairs_mean(&sets(&["alpha", "b", "c", "d", "e", "f", "alpha"]));
        assert_eq!(far, 0.0);
    }

    #[test]
    fn test_related_sentences_flow_better_than_unrelated() {
        let related = CoherenceReport::analyze(&TextSample::new(
            "The cache stores recent query results. The cache evicts old query results \
             when full. Evicted results are recomputed from the database.",
        ));
        let unrelated = CoherenceReport::analyze(&TextSample::new(
            "The cache stores recent query results. Penguins migrate across frozen seas. \
             Violin strings vibrate at tuned frequencies.",
        ));
        assert!(related.transition_quality > unrelated.transition_quality);
        assert!(related.overall > unrelated.overall);
        assert!((0.0..=1.0).contains(&related.overall));
    }
}
