//! Quality metrics and per-task-type calculators
//!
//! Seven metrics are scored for every response. Which heuristics feed each
//! metric depends on the task type of the resolved profile; every task type
//! has one [`CalculatorSet`], chosen by [`calculators_for`].

mod analytical;
mod creative;
mod general;
mod procedural;

pub use analytical::AnalyticalCalculators;
pub use creative::CreativeCalculators;
pub use general::GeneralCalculators;
pub use procedural::ProceduralCalculators;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analysis::{LexicalSignals, TextSample};
use crate::config::{ConfigError, TextAnalysisSettings};
use crate::profile::{TaskProfile, TaskType};

/// Tolerance for weight vectors summing to 1.0
pub const WEIGHT_TOLERANCE: f64 = 1e-6;

/// The seven quality dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OrganizationQuality,
    TechnicalAccuracy,
    Completeness,
    Thoroughness,
    Reliability,
    ScopeCoverage,
    DomainAppropriateness,
}

impl Metric {
    pub const ALL: [Metric; 7] = [
        Metric::OrganizationQuality,
        Metric::TechnicalAccuracy,
        Metric::Completeness,
        Metric::Thoroughness,
        Metric::Reliability,
        Metric::ScopeCoverage,
        Metric::DomainAppropriateness,
    ];

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::OrganizationQuality => "organization_quality",
            Metric::TechnicalAccuracy => "technical_accuracy",
            Metric::Completeness => "completeness",
            Metric::Thoroughness => "thoroughness",
            Metric::Reliability => "reliability",
            Metric::ScopeCoverage => "scope_coverage",
            Metric::DomainAppropriateness => "domain_appropriateness",
        }
    }

    /// Title-case name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            Metric::OrganizationQuality => "Organization Quality",
            Metric::TechnicalAccuracy => "Technical Accuracy",
            Metric::Completeness => "Completeness",
            Metric::Thoroughness => "Thoroughness",
            Metric::Reliability => "Reliability",
            Metric::ScopeCoverage => "Scope Coverage",
            Metric::DomainAppropriateness => "Domain Appropriateness",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("Unknown metric: {}", s))
    }
}

/// A validated weight vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricWeights {
    values: [f64; 7],
}

impl MetricWeights {
    /// Validate a configured weight mapping.
    ///
    /// Every metric must be present exactly once with a finite, non-negative
    /// weight, and the weights must sum to 1.0 within [`WEIGHT_TOLERANCE`].
    pub fn from_map(profile: &str, weights: &IndexMap<String, f64>) -> Result<Self, ConfigError> {
        let mut values = [None; 7];
        for (name, &weight) in weights {
            let metric: Metric = name.parse().map_err(|_| ConfigError::UnknownMetric {
                profile: profile.to_string(),
                metric: name.clone(),
            })?;
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeight {
                    profile: profile.to_string(),
                    metric: name.clone(),
                    weight,
                });
            }
            values[metric.index()] = Some(weight);
        }

        let mut resolved = [0.0; 7];
        for metric in Metric::ALL {
            resolved[metric.index()] =
                values[metric.index()].ok_or_else(|| ConfigError::MissingMetric {
                    profile: profile.to_string(),
                    metric: metric.as_str().to_string(),
                })?;
        }

        let sum: f64 = resolved.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(ConfigError::WeightSum {
                profile: profile.to_string(),
                sum,
            });
        }

        Ok(Self { values: resolved })
    }

    pub fn get(&self, metric: Metric) -> f64 {
        self.values[metric.index()]
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.into_iter().map(move |m| (m, self.get(m)))
    }
}

/// The seven metric scores of one evaluation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricSet {
    pub organization_quality: f64,
    pub technical_accuracy: f64,
    pub completeness: f64,
    pub thoroughness: f64,
    pub reliability: f64,
    pub scope_coverage: f64,
    pub domain_appropriateness: f64,
    pub word_count: usize,
    pub confidence: f64,
}

impl MetricSet {
    pub fn from_values(values: [f64; 7], word_count: usize, confidence: f64) -> Self {
        Self {
            organization_quality: values[0],
            technical_accuracy: values[1],
            completeness: values[2],
            thoroughness: values[3],
            reliability: values[4],
            scope_coverage: values[5],
            domain_appropriateness: values[6],
            word_count,
            confidence,
        }
    }

    /// All-zero metrics, as produced for an empty response
    pub fn zero(word_count: usize) -> Self {
        Self::from_values([0.0; 7], word_count, 0.0)
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::OrganizationQuality => self.organization_quality,
            Metric::TechnicalAccuracy => self.technical_accuracy,
            Metric::Completeness => self.completeness,
            Metric::Thoroughness => self.thoroughness,
            Metric::Reliability => self.reliability,
            Metric::ScopeCoverage => self.scope_coverage,
            Metric::DomainAppropriateness => self.domain_appropriateness,
        }
    }

    pub fn values(&self) -> [f64; 7] {
        Metric::ALL.map(|m| self.get(m))
    }

    /// Strongest and weakest metric; ties go to the earlier metric
    pub fn extremes(&self) -> (Metric, Metric) {
        let mut best = Metric::OrganizationQuality;
        let mut worst = Metric::OrganizationQuality;
        for metric in Metric::ALL {
            if self.get(metric) > self.get(best) {
                best = metric;
            }
            if self.get(metric) < self.get(worst) {
                worst = metric;
            }
        }
        (best, worst)
    }
}

/// Everything a calculator may read
pub struct ScoringContext<'a> {
    pub sample: &'a TextSample<'a>,
    pub signals: &'a LexicalSignals,
    pub profile: &'a TaskProfile,
    pub settings: &'a TextAnalysisSettings,
}

impl ScoringContext<'_> {
    /// Plain table-driven score for a metric
    pub fn rule_score(&self, metric: Metric) -> f64 {
        self.profile.patterns.rule(metric).score(self.sample)
    }

    /// Points from the profile's emphasis indicators
    pub fn emphasis_bonus(&self) -> f64 {
        crate::profile::patterns::matched_points(&self.profile.emphasis, self.sample)
    }
}

/// Clamp a calculator output into the metric range
pub fn bounded(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Metric calculators for one task type.
///
/// Every method has a table-driven default; a task type overrides only the
/// metrics where it blends in analyzer signals. Calculators return values in
/// `[0, 100]` and must be pure functions of the context.
pub trait CalculatorSet: Send + Sync {
    fn task_type(&self) -> TaskType;

    fn organization_quality(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.rule_score(Metric::OrganizationQuality)
    }

    fn technical_accuracy(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.rule_score(Metric::TechnicalAccuracy)
    }

    fn completeness(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.rule_score(Metric::Completeness)
    }

    /// Before the repetition damping applied by [`CalculatorSet::score_all`]
    fn thoroughness(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.rule_score(Metric::Thoroughness)
    }

    fn reliability(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.rule_score(Metric::Reliability)
    }

    fn scope_coverage(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.rule_score(Metric::ScopeCoverage)
    }

    fn domain_appropriateness(&self, ctx: &ScoringContext<'_>) -> f64 {
        ctx.rule_score(Metric::DomainAppropriateness)
    }

    /// Observations worth surfacing in the rationale
    fn notes(&self, _ctx: &ScoringContext<'_>) -> Vec<String> {
        Vec::new()
    }

    /// Raw scores for all seven metrics, in [`Metric::ALL`] order
    fn score_all(&self, ctx: &ScoringContext<'_>) -> [f64; 7] {
        let damping = 1.0 - 0.5 * ctx.signals.repetition.penalty;
        [
            self.organization_quality(ctx),
            self.technical_accuracy(ctx),
            self.completeness(ctx),
            self.thoroughness(ctx) * damping,
            self.reliability(ctx),
            self.scope_coverage(ctx),
            self.domain_appropriateness(ctx),
        ]
    }
}

static PROCEDURAL: ProceduralCalculators = ProceduralCalculators;
static CREATIVE: CreativeCalculators = CreativeCalculators;
static ANALYTICAL: AnalyticalCalculators = AnalyticalCalculators;
static GENERAL: GeneralCalculators = GeneralCalculators;

/// Calculator set for a task type
pub fn calculators_for(task_type: TaskType) -> &'static dyn CalculatorSet {
    match task_type {
        TaskType::Procedural => &PROCEDURAL,
        TaskType::Creative => &CREATIVE,
        TaskType::Analytical => &ANALYTICAL,
        TaskType::General => &GENERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_map(values: &[(&str, f64)]) -> IndexMap<String, f64> {
        values.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    fn balanced() -> IndexMap<String, f64> {
        weight_map(&[
            ("organization_quality", 0.15),
            ("technical_accuracy", 0.20),
            ("completeness", 0.15),
            ("thoroughness", 0.15),
            ("reliability", 0.10),
            ("scope_coverage", 0.10),
            ("domain_appropriateness", 0.15),
        ])
    }

    #[test]
    fn test_metric_names_round_trip() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>(), Ok(metric));
        }
        assert!("clarity".parse::<Metric>().is_err());
    }

    #[test]
    fn test_weights_accept_valid_vector() {
        let weights = MetricWeights::from_map("balanced", &balanced()).unwrap();
        assert!((weights.sum() - 1.0).abs() < WEIGHT_TOLERANCE);
        assert_eq!(weights.get(Metric::TechnicalAccuracy), 0.20);
    }

    #[test]
    fn test_weights_reject_bad_sum() {
        let mut map = balanced();
        map.insert("reliability".to_string(), 0.2);
        let err = MetricWeights::from_map("p", &map).unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum { .. }));
    }

    #[test]
    fn test_weights_reject_missing_and_unknown() {
        let mut map = balanced();
        map.shift_remove("scope_coverage");
        assert!(matches!(
            MetricWeights::from_map("p", &map).unwrap_err(),
            ConfigError::MissingMetric { .. }
        ));

        let mut map = balanced();
        map.insert("clarity".to_string(), 0.0);
        assert!(matches!(
            MetricWeights::from_map("p", &map).unwrap_err(),
            ConfigError::UnknownMetric { .. }
        ));
    }

    #[test]
    fn test_weights_reject_negative() {
        let mut map = balanced();
        map.insert("reliability".to_string(), -0.1);
        map.insert("completeness".to_string(), 0.35);
        assert!(matches!(
            MetricWeights::from_map("p", &map).unwrap_err(),
            ConfigError::InvalidWeight { .. }
        ));
    }

    #[test]
    fn test_extremes() {
        let set = MetricSet::from_values([10.0, 90.0, 50.0, 50.0, 5.0, 50.0, 90.0], 100, 50.0);
        assert_eq!(
            set.extremes(),
            (Metric::TechnicalAccuracy, Metric::Reliability)
        );
    }

    #[test]
    fn test_dispatch_matches_task_type() {
        for task_type in TaskType::all() {
            assert_eq!(calculators_for(task_type).task_type(), task_type);
        }
    }
}
