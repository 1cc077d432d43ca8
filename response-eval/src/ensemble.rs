//! Ensemble evaluation and disagreement detection
//!
//! The same response is scored under several strategies (profile overrides
//! and scoring biases). [`DisagreementDetector`] summarises the spread of the
//! overall scores and flags strategies that disagree with the rest.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::config::DisagreementSettings;
use crate::evaluator::EvaluationResult;
use crate::metrics::Metric;

/// Minimum number of strategies for a consensus
pub const MIN_STRATEGIES: usize = 2;

/// Below this, every strategy sits at the same distance from the mean and
/// none can be singled out as an outlier
pub const MIN_STRATEGIES_FOR_OUTLIERS: usize = 3;

/// One way of scoring a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStrategy {
    pub label: String,
    /// Profile name overriding the category's profile
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Added to every metric as `bias * 10` points
    #[serde(default)]
    pub scoring_bias: f64,
}

impl EvaluationStrategy {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            profile: None,
            scoring_bias: 0.0,
        }
    }

    pub fn with_bias(mut self, bias: f64) -> Self {
        self.scoring_bias = bias;
        self
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// A strategy's evaluation of the shared response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleEvaluationResult {
    pub strategy: String,
    pub result: EvaluationResult,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsensusFlag {
    StrategyOutliers,
    HighSpread,
    LowConsensus,
}

impl ConsensusFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsensusFlag::StrategyOutliers => "strategy_outliers",
            ConsensusFlag::HighSpread => "high_spread",
            ConsensusFlag::LowConsensus => "low_consensus",
        }
    }
}

/// Summary statistics of an ensemble
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusResult {
    /// Overall score per strategy, in input order
    pub scores: IndexMap<String, f64>,
    pub mean_score: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub consensus_level: f64,
    pub reliability: f64,
    pub effective_z_threshold: f64,
    pub z_scores: IndexMap<String, f64>,
    pub outliers: Vec<String>,
    pub disagreement_flag: bool,
    /// Population coefficient of variation of each metric
    pub metric_disagreement: IndexMap<String, f64>,
    /// Mean of each metric across strategies
    pub consensus_metrics: IndexMap<String, f64>,
    pub flags: Vec<ConsensusFlag>,
}

/// Detector output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConsensusOutcome {
    Consensus(ConsensusResult),
    InsufficientData { strategies: usize, required: usize },
}

impl ConsensusOutcome {
    pub fn consensus(&self) -> Option<&ConsensusResult> {
        match self {
            ConsensusOutcome::Consensus(result) => Some(result),
            ConsensusOutcome::InsufficientData { .. } => None,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ConsensusError {
    #[error("Duplicate strategy label: {0}")]
    DuplicateStrategy(String),

    #[error("Strategy '{strategy}' has a non-finite overall score")]
    NonFiniteScore { strategy: String },
}

/// Mean and population standard deviation
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

fn coefficient_of_variation(mean: f64, std_dev: f64) -> f64 {
    if mean == 0.0 {
        0.0
    } else {
        std_dev / mean.abs()
    }
}

/// Flags strategies whose scores disagree with the ensemble
#[derive(Debug, Clone, Default)]
pub struct DisagreementDetector {
    settings: DisagreementSettings,
}

impl DisagreementDetector {
    pub fn new(settings: DisagreementSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DisagreementSettings {
        &self.settings
    }

    /// z threshold after the small-sample cap
    pub fn effective_threshold(&self, strategies: usize) -> f64 {
        let attainable = ((strategies.max(1) - 1) as f64).sqrt();
        self.settings
            .outlier_z_threshold
            .min(self.settings.small_sample_ceiling * attainable)
    }

    pub fn detect_disagreement(
        &self,
        results: &[EnsembleEvaluationResult],
    ) -> Result<ConsensusOutcome, ConsensusError> {
        let mut seen = HashSet::new();
        for entry in results {
            if !seen.insert(entry.strategy.as_str()) {
                return Err(ConsensusError::DuplicateStrategy(entry.strategy.clone()));
            }
            if !entry.result.overall_score.is_finite() {
                return Err(ConsensusError::NonFiniteScore {
                    strategy: entry.strategy.clone(),
                });
            }
        }

        if results.len() < MIN_STRATEGIES {
            tracing::debug!(strategies = results.len(), "not enough strategies for consensus");
            return Ok(ConsensusOutcome::InsufficientData {
                strategies: results.len(),
                required: MIN_STRATEGIES,
            });
        }

        let scores: Vec<f64> = results.iter().map(|r| r.result.overall_score).collect();
        let (mean_score, std_dev) = mean_std(&scores);
        let threshold = self.effective_threshold(results.len());
        let can_single_out = results.len() >= MIN_STRATEGIES_FOR_OUTLIERS;

        let mut z_scores = IndexMap::new();
        let mut outliers = Vec::new();
        for entry in results {
            let deviation = (entry.result.overall_score - mean_score).abs();
            let z = if std_dev > 0.0 { deviation / std_dev } else { 0.0 };
            if can_single_out
                && std_dev > 0.0
                && z > threshold
                && deviation >= self.settings.min_outlier_gap
            {
                outliers.push(entry.strategy.clone());
            }
            z_scores.insert(entry.strategy.clone(), z);
        }

        let cv = coefficient_of_variation(mean_score, std_dev);
        let consensus_level = (1.0 - 2.0 * cv).max(0.0);
        let outlier_fraction = outliers.len() as f64 / results.len() as f64;
        let mut reliability = consensus_level * (1.0 - outlier_fraction);
        if consensus_level > self.settings.high_consensus {
            reliability += 0.1;
        }
        let reliability = reliability.min(1.0);

        let mut metric_disagreement = IndexMap::new();
        let mut consensus_metrics = IndexMap::new();
        for metric in Metric::ALL {
            let values: Vec<f64> = results.iter().map(|r| r.result.metrics.get(metric)).collect();
            let (mean, std) = mean_std(&values);
            metric_disagreement.insert(
                metric.as_str().to_string(),
                coefficient_of_variation(mean, std),
            );
            consensus_metrics.insert(metric.as_str().to_string(), mean);
        }

        let high_spread = std_dev > self.settings.spread_threshold;
        let mut flags = Vec::new();
        if !outliers.is_empty() {
            flags.push(ConsensusFlag::StrategyOutliers);
        }
        if high_spread {
            flags.push(ConsensusFlag::HighSpread);
        }
        if consensus_level < self.settings.consensus_threshold {
            flags.push(ConsensusFlag::LowConsensus);
        }
        let disagreement_flag = !outliers.is_empty() || high_spread;

        if disagreement_flag {
            tracing::info!(
                mean = mean_score,
                std_dev,
                outliers = ?outliers,
                "ensemble disagreement"
            );
        }

        Ok(ConsensusOutcome::Consensus(ConsensusResult {
            scores: results
                .iter()
                .map(|r| (r.strategy.clone(), r.result.overall_score))
                .collect(),
            mean_score,
            std_dev,
            coefficient_of_variation: cv,
            consensus_level,
            reliability,
            effective_z_threshold: threshold,
            z_scores,
            outliers,
            disagreement_flag,
            metric_disagreement,
            consensus_metrics,
            flags,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{ReasoningIndicators, ScoreLabel};
    use crate::metrics::MetricSet;
    use crate::profile::TaskType;
    use chrono::Utc;

    fn entry(strategy: &str, score: f64) -> EnsembleEvaluationResult {
        EnsembleEvaluationResult {
            strategy: strategy.to_string(),
            result: EvaluationResult {
                metrics: MetricSet::from_values([score; 7], 200, 60.0),
                overall_score: score,
                task_type: TaskType::General,
                profile: "general".to_string(),
                label: ScoreLabel::Good,
                rationale: String::new(),
                recommendations: Vec::new(),
                indicators: ReasoningIndicators::default(),
                signals: None,
                defects: Vec::new(),
                pattern_version: 1,
                timestamp: Utc::now(),
            },
        }
    }

    fn detect(scores: &[(&str, f64)]) -> Result<ConsensusOutcome, ConsensusError> {
        let results: Vec<_> = scores.iter().map(|(s, v)| entry(s, *v)).collect();
        DisagreementDetector::default().detect_disagreement(&results)
    }

    fn consensus(scores: &[(&str, f64)]) -> ConsensusResult {
        match detect(scores).unwrap() {
            ConsensusOutcome::Consensus(result) => result,
            other => panic!("expected consensus, got {:?}", other),
        }
    }

    #[test]
    fn test_lone_dissenter_is_outlier() {
        let result = consensus(&[("a", 80.0), ("b", 82.0), ("c", 40.0)]);
        assert!((result.mean_score - 67.333).abs() < 0.01);
        assert!((result.std_dev - 19.34).abs() < 0.01);
        assert_eq!(result.outliers, vec!["c".to_string()]);
        assert!(result.disagreement_flag);
        assert!(result.flags.contains(&ConsensusFlag::StrategyOutliers));
        assert!(result.flags.contains(&ConsensusFlag::HighSpread));
        assert!(result.z_scores["c"] > result.effective_z_threshold);
    }

    #[test]
    fn test_tight_cluster_agrees() {
        let result = consensus(&[("a", 75.0), ("b", 76.0), ("c", 74.0)]);
        assert!(result.outliers.is_empty());
        assert!(!result.disagreement_flag);
        assert!(result.flags.is_empty());
        assert!(result.consensus_level > 0.95);
    }

    #[test]
    fn test_identical_scores() {
        let result = consensus(&[("a", 70.0), ("b", 70.0)]);
        assert_eq!(result.std_dev, 0.0);
        assert!(result.outliers.is_empty());
        assert_eq!(result.consensus_level, 1.0);
        assert_eq!(result.reliability, 1.0);
        assert_eq!(result.metric_disagreement["completeness"], 0.0);
        assert_eq!(result.consensus_metrics["completeness"], 70.0);
    }

    #[test]
    fn test_two_strategies_flag_spread_only() {
        let result = consensus(&[("a", 90.0), ("b", 40.0)]);
        assert!(result.outliers.is_empty());
        assert!(result.disagreement_flag);
        assert_eq!(result.flags[0], ConsensusFlag::HighSpread);
    }

    #[test]
    fn test_all_zero_scores() {
        let result = consensus(&[("a", 0.0), ("b", 0.0), ("c", 0.0)]);
        assert_eq!(result.coefficient_of_variation, 0.0);
        assert!(!result.disagreement_flag);
    }

    #[test]
    fn test_insufficient_strategies() {
        assert_eq!(
            detect(&[("only", 50.0)]).unwrap(),
            ConsensusOutcome::InsufficientData {
                strategies: 1,
                required: 2
            }
        );
        assert_eq!(
            detect(&[]).unwrap(),
            ConsensusOutcome::InsufficientData {
                strategies: 0,
                required: 2
            }
        );
    }

    #[test]
    fn test_duplicate_label_rejected() {
        let err = detect(&[("a", 50.0), ("a", 60.0)]).unwrap_err();
        assert_eq!(err, ConsensusError::DuplicateStrategy("a".to_string()));
    }

    #[test]
    fn test_non_finite_score_rejected() {
        let err = detect(&[("a", 50.0), ("b", f64::NAN)]).unwrap_err();
        assert!(matches!(err, ConsensusError::NonFiniteScore { strategy } if strategy == "b"));
    }

    #[test]
    fn test_effective_threshold() {
        let detector = DisagreementDetector::default();
        assert!((detector.effective_threshold(3) - 0.9 * 2f64.sqrt()).abs() < 1e-12);
        assert_eq!(detector.effective_threshold(10), 1.5);
    }

    #[test]
    fn test_reproducible() {
        let scores = [("a", 61.3), ("b", 72.9), ("c", 55.1), ("d", 90.0)];
        assert_eq!(detect(&scores).unwrap(), detect(&scores).unwrap());
    }

    #[test]
    fn test_outcome_serializes_with_status() {
        let json = serde_json::to_string(&detect(&[("a", 1.0)]).unwrap()).unwrap();
        assert!(json.contains("\"status\":\"insufficient_data\""));
    }
}
