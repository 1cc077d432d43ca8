//! Lexical and statistical analyzers

pub mod coherence;
pub mod entropy;
pub mod formatting;
pub mod repetition;
pub mod summary;
pub mod text;

pub use coherence::CoherenceReport;
pub use entropy::{
    ngram_entropy, shannon_entropy, EntropyComparison, EntropyPatterns, EntropyProfile,
    EntropyTrend, VocabularyProfile,
};
pub use formatting::formatting_score;
pub use repetition::RepetitionReport;
pub use summary::{BatchSummary, TopPerformer};
pub use text::{TextSample, TextStatistics};

use serde::{Deserialize, Serialize};

/// Analyzer output attached to every evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicalSignals {
    pub statistics: TextStatistics,
    pub entropy: EntropyProfile,
    pub vocabulary_diversity: f64,
    pub repetition: RepetitionReport,
    pub coherence: CoherenceReport,
    pub formatting: f64,
}

impl LexicalSignals {
    pub fn analyze(sample: &TextSample<'_>) -> Self {
        let statistics = sample.statistics();

        Self {
            entropy: EntropyProfile::from_sample(sample),
            vocabulary_diversity: statistics.vocabulary_diversity,
            statistics,
            repetition: RepetitionReport::analyze(sample.original()),
            coherence: CoherenceReport::analyze(sample),
            formatting: formatting_score(sample.original()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signals_carry_entropy_profile() {
        let sample = TextSample::new(
            "Check the disk usage first. Then rotate the logs and restart the service \
             so the new configuration is picked up.",
        );
        let signals = LexicalSignals::analyze(&sample);

        assert_eq!(signals.entropy, EntropyProfile::from_sample(&sample));
        assert!(signals.entropy.token_entropy > 0.0);
        assert!(signals.entropy.entropy_quality_ratio > 0.0);
        assert!(signals.entropy.entropy_quality_ratio <= 1.0);
        assert!(!signals.entropy.patterns.has_repetitive_patterns);
    }

    #[test]
    fn test_looping_text_flags_entropy_patterns() {
        let text = "the same phrase again ".repeat(20);
        let signals = LexicalSignals::analyze(&TextSample::new(&text));
        assert!(signals.entropy.patterns.has_repetitive_patterns);
        assert!(signals.repetition.penalty > 0.0);
    }
}
