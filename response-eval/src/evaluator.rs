//! Single-response evaluation
//!
//! [`Evaluator`] owns the validated configuration and the compiled profiles.
//! Evaluation itself is a pure function of (text, profile): the lexical
//! analyzers run once, the profile's calculator set scores the seven
//! metrics, and the aggregator combines them with the profile weights.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::aggregate::{self, round1, ConfidenceInputs, MetricDefect};
use crate::analysis::{LexicalSignals, TextSample};
use crate::config::{ConfigError, EvalConfig, ScoreThresholds};
use crate::drift::{DriftDetector, DriftError, DriftReport, ScoreHistoryPoint};
use crate::ensemble::{EnsembleEvaluationResult, EvaluationStrategy};
use crate::metrics::{calculators_for, Metric, MetricSet, ScoringContext};
use crate::profile::{ProfileResolver, ReasoningLexicon, TaskProfile, TaskType};

/// Rationale given for empty or whitespace-only input
pub const EMPTY_RESPONSE: &str = "empty response provided";

/// A response to score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseInput {
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
    /// Earlier aggregated scores for the same stream of responses
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<ScoreHistoryPoint>,
}

impl ResponseInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
            history: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_history(mut self, history: Vec<ScoreHistoryPoint>) -> Self {
        self.history = history;
        self
    }
}

/// An evaluation together with the drift of its history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextualEvaluation {
    pub result: EvaluationResult,
    /// Present when the input carried a history
    pub drift: Option<DriftReport>,
}

/// Human-readable score band
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    Excellent,
    Good,
    Satisfactory,
    Poor,
    VeryPoor,
}

impl ScoreLabel {
    pub fn from_score(score: f64, thresholds: &ScoreThresholds) -> Self {
        if score >= thresholds.excellent {
            ScoreLabel::Excellent
        } else if score >= thresholds.good {
            ScoreLabel::Good
        } else if score >= thresholds.satisfactory {
            ScoreLabel::Satisfactory
        } else if score >= thresholds.poor {
            ScoreLabel::Poor
        } else {
            ScoreLabel::VeryPoor
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreLabel::Excellent => "excellent",
            ScoreLabel::Good => "good",
            ScoreLabel::Satisfactory => "satisfactory",
            ScoreLabel::Poor => "poor",
            ScoreLabel::VeryPoor => "very_poor",
        }
    }
}

impl std::fmt::Display for ScoreLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Reasoning phrases found in the response
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReasoningIndicators {
    pub step: Vec<String>,
    pub logic: Vec<String>,
    pub evidence: Vec<String>,
    pub verification: Vec<String>,
    pub hedging: Vec<String>,
    pub certainty: Vec<String>,
}

impl ReasoningIndicators {
    pub fn extract(lexicon: &ReasoningLexicon, sample: &TextSample<'_>) -> Self {
        let found = |phrases: &[String]| -> Vec<String> {
            phrases
                .iter()
                .filter(|p| sample.lower().contains(p.to_lowercase().as_str()))
                .cloned()
                .collect()
        };

        Self {
            step: found(&lexicon.step),
            logic: found(&lexicon.logic),
            evidence: found(&lexicon.evidence),
            verification: found(&lexicon.verification),
            hedging: found(&lexicon.hedging),
            certainty: found(&lexicon.certainty),
        }
    }
}

/// Outcome of scoring one response with one profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub metrics: MetricSet,
    pub overall_score: f64,
    pub task_type: TaskType,
    pub profile: String,
    pub label: ScoreLabel,
    pub rationale: String,
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub indicators: ReasoningIndicators,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signals: Option<LexicalSignals>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defects: Vec<MetricDefect>,
    pub pattern_version: u32,
    pub timestamp: DateTime<Utc>,
}

impl EvaluationResult {
    /// True when the two results carry the same scores, ignoring timestamps
    pub fn same_scores(&self, other: &EvaluationResult) -> bool {
        self.metrics == other.metrics
            && self.overall_score == other.overall_score
            && self.profile == other.profile
            && self.label == other.label
    }
}

fn recommendation_for(metric: Metric) -> &'static str {
    match metric {
        Metric::OrganizationQuality => {
            "Improve structure with explicit step indicators (first, second, then), headings or lists"
        }
        Metric::TechnicalAccuracy => {
            "Strengthen logical flow with more connecting words (therefore, because, consequently)"
        }
        Metric::Completeness => {
            "Better integrate evidence with phrases like 'based on', 'according to', 'data shows'"
        }
        Metric::Thoroughness => "Explore the problem in more depth and discuss its implications",
        Metric::Reliability => {
            "Add verification steps with self-checking language (verify, confirm, review)"
        }
        Metric::ScopeCoverage => "Cover more aspects, alternatives and edge cases",
        Metric::DomainAppropriateness => "Use terminology appropriate to the task domain",
    }
}

/// Evaluates responses against compiled profiles
#[derive(Debug)]
pub struct Evaluator {
    config: EvalConfig,
    resolver: ProfileResolver,
}

impl Evaluator {
    /// Validate the configuration and compile its profiles
    pub fn new(config: EvalConfig) -> Result<Self, ConfigError> {
        config.check_settings()?;
        let resolver = ProfileResolver::from_config(&config)?;
        tracing::info!(
            profiles = config.profiles.len(),
            categories = config.categories.len(),
            pattern_version = config.patterns.version,
            "evaluator ready"
        );
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ProfileResolver {
        &self.resolver
    }

    pub fn resolve_profile(&self, category: Option<&str>) -> Arc<TaskProfile> {
        self.resolver.resolve_profile(category)
    }

    /// Score a response with the profile its category resolves to
    pub fn evaluate(&self, text: &str, category: Option<&str>) -> EvaluationResult {
        let profile = self.resolve_profile(category);
        self.evaluate_with(text, &profile, 0.0)
    }

    pub fn evaluate_input(&self, input: &ResponseInput) -> EvaluationResult {
        self.evaluate(&input.text, input.category.as_deref())
    }

    /// Score the input, then run drift detection over its history extended
    /// with the new overall score
    pub fn evaluate_in_context(&self, input: &ResponseInput) -> Result<ContextualEvaluation, DriftError> {
        let result = self.evaluate_input(input);
        if input.history.is_empty() {
            return Ok(ContextualEvaluation { result, drift: None });
        }

        let mut points = input.history.clone();
        points.push(ScoreHistoryPoint::new(result.timestamp, result.overall_score));
        let drift = DriftDetector::new(self.config.drift.clone()).detect_drift(&points)?;

        Ok(ContextualEvaluation {
            result,
            drift: Some(drift),
        })
    }

    /// Score the same response once per strategy
    pub fn evaluate_ensemble(
        &self,
        text: &str,
        category: Option<&str>,
        strategies: &[EvaluationStrategy],
    ) -> Vec<EnsembleEvaluationResult> {
        let resolved = self.resolve_profile(category);

        strategies
            .iter()
            .map(|strategy| {
                let profile = match &strategy.profile {
                    Some(name) => self.resolver.profile(name).unwrap_or_else(|| {
                        tracing::warn!(
                            strategy = %strategy.label,
                            profile = %name,
                            "unknown strategy profile, using resolved profile"
                        );
                        Arc::clone(&resolved)
                    }),
                    None => Arc::clone(&resolved),
                };
                EnsembleEvaluationResult {
                    strategy: strategy.label.clone(),
                    result: self.evaluate_with(text, &profile, strategy.scoring_bias),
                }
            })
            .collect()
    }

    /// Score a response with an explicit profile and scoring bias
    pub fn evaluate_with(&self, text: &str, profile: &TaskProfile, bias: f64) -> EvaluationResult {
        let sample = TextSample::new(text);
        if sample.is_blank() {
            return self.empty_result(profile);
        }

        let signals = LexicalSignals::analyze(&sample);
        let ctx = ScoringContext {
            sample: &sample,
            signals: &signals,
            profile,
            settings: &self.config.text_analysis,
        };
        let calculators = calculators_for(profile.task_type);

        let (mut values, defects) = aggregate::contain_metrics(calculators.score_all(&ctx));
        if bias != 0.0 && bias.is_finite() {
            for value in values.iter_mut() {
                *value = round1((*value + bias * 10.0).clamp(0.0, 100.0));
            }
        }

        let confidence = aggregate::confidence(ConfidenceInputs {
            word_count: sample.word_count(),
            indicator_hits: profile.patterns.indicator_hits(&sample),
            repetition_penalty: signals.repetition.penalty,
            minimum_word_count: self.config.thresholds.minimum_word_count,
            density_target: self.config.text_analysis.density_target,
        });

        let metrics = MetricSet::from_values(values, sample.word_count(), confidence);
        let overall_score = aggregate::weighted_score(&metrics, &profile.weights);
        let label = ScoreLabel::from_score(overall_score, &self.config.thresholds);

        let mut notes = calculators.notes(&ctx);
        if signals.repetition.penalty > 0.0 {
            notes.push(format!(
                "repetitive output (penalty {:.2})",
                signals.repetition.penalty
            ));
        } else if signals.entropy.patterns.has_repetitive_patterns {
            notes.push(format!(
                "low-entropy phrasing (entropy ratio {:.2})",
                signals.entropy.entropy_quality_ratio
            ));
        }
        let rationale = self.rationale(profile, label, overall_score, &metrics, &notes);

        tracing::debug!(
            profile = %profile.name,
            words = sample.word_count(),
            overall = overall_score,
            confidence,
            "evaluated response"
        );

        EvaluationResult {
            recommendations: self.recommendations(&metrics),
            indicators: ReasoningIndicators::extract(&self.config.patterns.lexicon, &sample),
            metrics,
            overall_score,
            task_type: profile.task_type,
            profile: profile.name.clone(),
            label,
            rationale,
            signals: Some(signals),
            defects,
            pattern_version: self.config.patterns.version,
            timestamp: Utc::now(),
        }
    }

    fn empty_result(&self, profile: &TaskProfile) -> EvaluationResult {
        tracing::debug!(profile = %profile.name, "empty response");
        EvaluationResult {
            metrics: MetricSet::zero(0),
            overall_score: 0.0,
            task_type: profile.task_type,
            profile: profile.name.clone(),
            label: ScoreLabel::from_score(0.0, &self.config.thresholds),
            rationale: EMPTY_RESPONSE.to_string(),
            recommendations: vec![EMPTY_RESPONSE.to_string()],
            indicators: ReasoningIndicators::default(),
            signals: None,
            defects: Vec::new(),
            pattern_version: self.config.patterns.version,
            timestamp: Utc::now(),
        }
    }

    fn rationale(
        &self,
        profile: &TaskProfile,
        label: ScoreLabel,
        overall: f64,
        metrics: &MetricSet,
        notes: &[String],
    ) -> String {
        let (best, worst) = metrics.extremes();
        let mut rationale = format!(
            "{} profile ({}): {} at {:.1}. Strongest: {} ({:.1}); weakest: {} ({:.1}).",
            profile.name,
            profile.task_type,
            label,
            overall,
            best.display_name(),
            metrics.get(best),
            worst.display_name(),
            metrics.get(worst),
        );
        if !notes.is_empty() {
            rationale.push_str(" Notes: ");
            rationale.push_str(&notes.join("; "));
            rationale.push('.');
        }
        rationale
    }

    fn recommendations(&self, metrics: &MetricSet) -> Vec<String> {
        let threshold = self.config.thresholds.recommendation_threshold;
        let recommendations: Vec<String> = Metric::ALL
            .iter()
            .filter(|m| metrics.get(**m) < threshold)
            .map(|m| recommendation_for(*m).to_string())
            .collect();

        if recommendations.is_empty() {
            vec!["Strong performance across all metrics".to_string()]
        } else {
            recommendations
        }
    }
}
