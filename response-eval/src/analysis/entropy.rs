//! Token entropy and vocabulary richness
//!
//! All entropies are in bits. Counting goes through `BTreeMap` so that the
//! floating-point summation order, and therefore every result, is stable
//! across runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TextSample;

const WINDOW: usize = 20;
const WINDOW_STEP: usize = 10;
const TREND_THRESHOLD: f64 = 0.5;
const DROP_THRESHOLD: f64 = 1.0;
const REPEATED_TRIGRAM_LIMIT: f64 = 0.3;

fn entropy_of_counts<I: IntoIterator<Item = usize>>(counts: I, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .into_iter()
        .map(|c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum::<f64>()
        .max(0.0)
}

/// Shannon entropy of the token distribution
pub fn shannon_entropy<S: AsRef<str>>(tokens: &[S]) -> f64 {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_ref()).or_default() += 1;
    }
    entropy_of_counts(counts.into_values(), tokens.len())
}

/// Entropy of the n-gram distribution; 0 when there are fewer than `n` tokens
pub fn ngram_entropy<S: AsRef<str>>(tokens: &[S], n: usize) -> f64 {
    if n == 0 || tokens.len() < n {
        return 0.0;
    }
    let counts = ngram_counts(tokens, n);
    entropy_of_counts(counts.into_values(), tokens.len() - n + 1)
}

fn ngram_counts<S: AsRef<str>>(tokens: &[S], n: usize) -> BTreeMap<Vec<&str>, usize> {
    let mut counts = BTreeMap::new();
    if n == 0 {
        return counts;
    }
    for window in tokens.windows(n) {
        let key: Vec<&str> = window.iter().map(AsRef::as_ref).collect();
        *counts.entry(key).or_default() += 1;
    }
    counts
}

/// Vocabulary size and spread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyProfile {
    pub vocab_entropy: f64,
    /// unique / total
    pub vocab_diversity: f64,
    /// words seen exactly once / unique
    pub unique_ratio: f64,
    pub unique_words: usize,
    pub total_words: usize,
}

impl VocabularyProfile {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for token in tokens {
            *counts.entry(token.as_ref()).or_default() += 1;
        }

        let total = tokens.len();
        let unique = counts.len();
        let hapax = counts.values().filter(|&&c| c == 1).count();

        Self {
            vocab_entropy: entropy_of_counts(counts.values().copied(), total),
            vocab_diversity: if total == 0 { 0.0 } else { unique as f64 / total as f64 },
            unique_ratio: if unique == 0 { 0.0 } else { hapax as f64 / unique as f64 },
            unique_words: unique,
            total_words: total,
        }
    }
}

/// Direction of local entropy across the text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntropyTrend {
    Decreasing,
    Stable,
    Increasing,
}

impl EntropyTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntropyTrend::Decreasing => "decreasing",
            EntropyTrend::Stable => "stable",
            EntropyTrend::Increasing => "increasing",
        }
    }
}

/// Repetition and local-entropy patterns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyPatterns {
    pub repeated_trigram_ratio: f64,
    pub has_repetitive_patterns: bool,
    pub local_entropies: Vec<f64>,
    pub entropy_trend: EntropyTrend,
    /// Indices of windows more than one bit below their predecessor
    pub local_entropy_drops: Vec<usize>,
}

impl EntropyPatterns {
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S]) -> Self {
        let trigrams = ngram_counts(tokens, 3);
        let trigram_total = tokens.len().saturating_sub(2);
        let repeated_trigram_ratio = if trigram_total == 0 {
            0.0
        } else {
            1.0 - trigrams.len() as f64 / trigram_total as f64
        };

        let bigram_total = tokens.len().saturating_sub(1);
        let low_bigram_entropy = tokens.len() >= WINDOW
            && ngram_entropy(tokens, 2) < 0.5 * (bigram_total as f64).log2();

        let local_entropies: Vec<f64> = if tokens.len() < WINDOW {
            Vec::new()
        } else {
            (0..=tokens.len() - WINDOW)
                .step_by(WINDOW_STEP)
                .map(|start| shannon_entropy(&tokens[start..start + WINDOW]))
                .collect()
        };

        let entropy_trend = match (local_entropies.first(), local_entropies.last()) {
            (Some(first), Some(last)) if local_entropies.len() >= 2 => {
                let delta = last - first;
                if delta > TREND_THRESHOLD {
                    EntropyTrend::Increasing
                } else if delta < -TREND_THRESHOLD {
                    EntropyTrend::Decreasing
                } else {
                    EntropyTrend::Stable
                }
            }
            _ => EntropyTrend::Stable,
        };

        let local_entropy_drops = local_entropies
            .windows(2)
            .enumerate()
            .filter(|(_, pair)| pair[1] < pair[0] - DROP_THRESHOLD)
            .map(|(i, _)| i + 1)
            .collect();

        Self {
            repeated_trigram_ratio,
            has_repetitive_patterns: repeated_trigram_ratio >= REPEATED_TRIGRAM_LIMIT
                || low_bigram_entropy,
            local_entropies,
            entropy_trend,
            local_entropy_drops,
        }
    }
}

/// Full entropy analysis of a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyProfile {
    pub token_entropy: f64,
    pub bigram_entropy: f64,
    pub trigram_entropy: f64,
    pub vocabulary: VocabularyProfile,
    pub patterns: EntropyPatterns,
    /// token entropy relative to its maximum for this length
    pub entropy_quality_ratio: f64,
}

/// Differences between two entropy profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntropyComparison {
    pub token_entropy_diff: f64,
    pub bigram_entropy_diff: f64,
    pub vocab_diversity_diff: f64,
    /// 1.0 for identical token entropy, falling to 0.0
    pub entropy_similarity: f64,
}

impl EntropyProfile {
    pub fn analyze(text: &str) -> Self {
        Self::from_sample(&TextSample::new(text))
    }

    pub fn from_sample(sample: &TextSample<'_>) -> Self {
        let tokens = sample.tokens();
        let token_entropy = shannon_entropy(tokens);
        let total = tokens.len();

        let entropy_quality_ratio = if total <= 1 {
            0.0
        } else {
            (token_entropy / (total as f64).log2()).clamp(0.0, 1.0)
        };

        Self {
            token_entropy,
            bigram_entropy: ngram_entropy(tokens, 2),
            trigram_entropy: ngram_entropy(tokens, 3),
            vocabulary: VocabularyProfile::from_tokens(tokens),
            patterns: EntropyPatterns::from_tokens(tokens),
            entropy_quality_ratio,
        }
    }

    pub fn compare(&self, other: &EntropyProfile) -> EntropyComparison {
        let high = self.token_entropy.max(other.token_entropy);
        let entropy_similarity = if high <= 0.0 {
            1.0
        } else {
            (1.0 - (self.token_entropy - other.token_entropy).abs() / high).clamp(0.0, 1.0)
        };

        EntropyComparison {
            token_entropy_diff: other.token_entropy - self.token_entropy,
            bigram_entropy_diff: other.bigram_entropy - self.bigram_entropy,
            vocab_diversity_diff: other.vocabulary.vocab_diversity
                - self.vocabulary.vocab_diversity,
            entropy_similarity,
        }
    }
}
