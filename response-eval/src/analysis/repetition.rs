//! Looping and collapsed-output detection

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Repetition measures over lowercased whitespace words
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepetitionReport {
    /// 1 - unique trigrams / total trigrams
    pub repeated_trigram_ratio: f64,
    /// Longest run of consecutive identical words
    pub longest_repeated_run: usize,
    /// Share of the most frequent word
    pub dominant_token_share: f64,
    /// 0 for natural text, approaching 1 for degenerate output
    pub penalty: f64,
}

impl RepetitionReport {
    pub fn analyze(text: &str) -> Self {
        let words: Vec<String> = text.split_whitespace().map(str::to_lowercase).collect();
        if words.is_empty() {
            return Self::default();
        }

        let trigram_total = words.len().saturating_sub(2);
        let unique_trigrams: BTreeSet<&[String]> = words.windows(3).collect();
        let repeated_trigram_ratio = if trigram_total == 0 {
            0.0
        } else {
            1.0 - unique_trigrams.len() as f64 / trigram_total as f64
        };

        let mut longest_repeated_run = 1;
        let mut run = 1;
        for pair in words.windows(2) {
            if pair[0] == pair[1] {
                run += 1;
                longest_repeated_run = longest_repeated_run.max(run);
            } else {
                run = 1;
            }
        }

        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for word in &words {
            *counts.entry(word.as_str()).or_default() += 1;
        }
        let dominant = counts.values().copied().max().unwrap_or(0);
        let dominant_token_share = dominant as f64 / words.len() as f64;

        let looping = if trigram_total >= 10 {
            (repeated_trigram_ratio - 0.3) / 0.5
        } else {
            0.0
        };
        let dominance = if words.len() >= 10 {
            (dominant_token_share - 0.25) / 0.5
        } else {
            0.0
        };
        let stutter = (longest_repeated_run as f64 - 3.0) / 7.0;

        let penalty = [looping, dominance, stutter]
            .into_iter()
            .map(|p| p.clamp(0.0, 1.0))
            .fold(0.0, f64::max);

        Self {
            repeated_trigram_ratio,
            longest_repeated_run,
            dominant_token_share,
            penalty,
        }
    }
}
