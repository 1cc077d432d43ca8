//! Versioned indicator tables
//!
//! Every heuristic signal the calculators use lives here as data: a metric
//! rule is a length-based base score plus the points of each indicator found
//! in the response, minus the points of each penalty pattern found. Tables
//! are serializable so they can be tuned from TOML and compiled once at load.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::TaskType;
use crate::analysis::TextSample;
use crate::config::ConfigError;
use crate::metrics::Metric;

/// How an indicator pattern is matched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Case-insensitive substring
    #[default]
    Phrase,
    /// Case-sensitive substring, used for formatting markers
    Exact,
    /// Whole word, case-insensitive
    Word,
    /// Regular expression against the original text
    Regex,
}

fn is_phrase(kind: &MatchKind) -> bool {
    *kind == MatchKind::Phrase
}

/// A pattern worth a fixed number of points when present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub pattern: String,
    pub points: f64,
    #[serde(default, skip_serializing_if = "is_phrase")]
    pub kind: MatchKind,
}

impl Indicator {
    pub fn new(pattern: impl Into<String>, points: f64, kind: MatchKind) -> Self {
        Self {
            pattern: pattern.into(),
            points,
            kind,
        }
    }

    pub fn phrase(pattern: impl Into<String>, points: f64) -> Self {
        Self::new(pattern, points, MatchKind::Phrase)
    }

    pub fn exact(pattern: impl Into<String>, points: f64) -> Self {
        Self::new(pattern, points, MatchKind::Exact)
    }

    pub fn word(pattern: impl Into<String>, points: f64) -> Self {
        Self::new(pattern, points, MatchKind::Word)
    }

    pub fn regex(pattern: impl Into<String>, points: f64) -> Self {
        Self::new(pattern, points, MatchKind::Regex)
    }

    /// Compile for matching; `task_type` only labels errors
    pub fn compile(&self, task_type: TaskType) -> Result<CompiledIndicator, ConfigError> {
        if !self.points.is_finite() || self.points < 0.0 {
            return Err(ConfigError::Pattern {
                task_type,
                pattern: self.pattern.clone(),
                message: format!("points must be a non-negative number, got {}", self.points),
            });
        }
        if self.pattern.is_empty() {
            return Err(ConfigError::Pattern {
                task_type,
                pattern: String::new(),
                message: "pattern must not be empty".to_string(),
            });
        }

        let needle = match self.kind {
            MatchKind::Phrase => Needle::Phrase(self.pattern.to_lowercase()),
            MatchKind::Exact => Needle::Exact(self.pattern.clone()),
            MatchKind::Word => Needle::Word(self.pattern.to_lowercase()),
            MatchKind::Regex => Needle::Regex(Regex::new(&self.pattern).map_err(|e| {
                ConfigError::Pattern {
                    task_type,
                    pattern: self.pattern.clone(),
                    message: e.to_string(),
                }
            })?),
        };

        Ok(CompiledIndicator {
            label: self.pattern.clone(),
            needle,
            points: self.points,
        })
    }
}

/// Scoring rule for one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRule {
    /// Words per base point; 0 disables the length component
    pub base_divisor: f64,
    /// Upper bound of the length component
    pub base_cap: f64,
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub penalties: Vec<Indicator>,
}

impl MetricRule {
    pub fn new(base_divisor: f64, base_cap: f64, indicators: Vec<Indicator>) -> Self {
        Self {
            base_divisor,
            base_cap,
            indicators,
            penalties: Vec::new(),
        }
    }

    pub fn with_penalties(mut self, penalties: Vec<Indicator>) -> Self {
        self.penalties = penalties;
        self
    }

    fn compile(&self, task_type: TaskType, metric: Metric) -> Result<CompiledRule, ConfigError> {
        if !self.base_divisor.is_finite() || self.base_divisor < 0.0 {
            return Err(ConfigError::Pattern {
                task_type,
                pattern: format!("{}.base_divisor", metric),
                message: format!("must be >= 0, got {}", self.base_divisor),
            });
        }
        if !(0.0..=100.0).contains(&self.base_cap) {
            return Err(ConfigError::Pattern {
                task_type,
                pattern: format!("{}.base_cap", metric),
                message: format!("must be within 0..=100, got {}", self.base_cap),
            });
        }

        Ok(CompiledRule {
            base_divisor: self.base_divisor,
            base_cap: self.base_cap,
            indicators: compile_all(&self.indicators, task_type)?,
            penalties: compile_all(&self.penalties, task_type)?,
        })
    }
}

fn compile_all(
    indicators: &[Indicator],
    task_type: TaskType,
) -> Result<Vec<CompiledIndicator>, ConfigError> {
    indicators.iter().map(|i| i.compile(task_type)).collect()
}

/// Indicator rules for every metric of one task type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSet {
    pub organization_quality: MetricRule,
    pub technical_accuracy: MetricRule,
    pub completeness: MetricRule,
    pub thoroughness: MetricRule,
    pub reliability: MetricRule,
    pub scope_coverage: MetricRule,
    pub domain_appropriateness: MetricRule,
    /// Markers blended into technical accuracy by the creative calculators
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creativity_markers: Vec<Indicator>,
}

impl PatternSet {
    pub fn rule(&self, metric: Metric) -> &MetricRule {
        match metric {
            Metric::OrganizationQuality => &self.organization_quality,
            Metric::TechnicalAccuracy => &self.technical_accuracy,
            Metric::Completeness => &self.completeness,
            Metric::Thoroughness => &self.thoroughness,
            Metric::Reliability => &self.reliability,
            Metric::ScopeCoverage => &self.scope_coverage,
            Metric::DomainAppropriateness => &self.domain_appropriateness,
        }
    }

    pub fn compile(&self, task_type: TaskType) -> Result<CompiledPatterns, ConfigError> {
        let mut rules = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            rules.push(self.rule(metric).compile(task_type, metric)?);
        }
        Ok(CompiledPatterns {
            task_type,
            rules,
            creativity_markers: compile_all(&self.creativity_markers, task_type)?,
        })
    }
}

/// Phrase lists reported back to callers as reasoning evidence
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReasoningLexicon {
    #[serde(default)]
    pub step: Vec<String>,
    #[serde(default)]
    pub logic: Vec<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
    #[serde(default)]
    pub verification: Vec<String>,
    #[serde(default)]
    pub hedging: Vec<String>,
    #[serde(default)]
    pub certainty: Vec<String>,
}

/// The full, versioned pattern table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternTable {
    pub version: u32,
    #[serde(default)]
    pub lexicon: ReasoningLexicon,
    pub procedural: PatternSet,
    pub creative: PatternSet,
    pub analytical: PatternSet,
    pub general: PatternSet,
}

impl PatternTable {
    pub fn get(&self, task_type: TaskType) -> &PatternSet {
        match task_type {
            TaskType::Procedural => &self.procedural,
            TaskType::Creative => &self.creative,
            TaskType::Analytical => &self.analytical,
            TaskType::General => &self.general,
        }
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        super::defaults::default_pattern_table()
    }
}

#[derive(Debug, Clone)]
enum Needle {
    Phrase(String),
    Exact(String),
    Word(String),
    Regex(Regex),
}

/// An indicator ready to match against a [`TextSample`]
#[derive(Debug, Clone)]
pub struct CompiledIndicator {
    label: String,
    needle: Needle,
    points: f64,
}

impl CompiledIndicator {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn points(&self) -> f64 {
        self.points
    }

    pub fn matches(&self, sample: &TextSample<'_>) -> bool {
        match &self.needle {
            Needle::Phrase(p) => sample.lower().contains(p.as_str()),
            Needle::Exact(p) => sample.original().contains(p.as_str()),
            Needle::Word(w) => sample.has_word(w),
            Needle::Regex(re) => re.is_match(sample.original()),
        }
    }
}

/// Sum the points of every indicator present in the sample
pub fn matched_points(indicators: &[CompiledIndicator], sample: &TextSample<'_>) -> f64 {
    indicators
        .iter()
        .filter(|i| i.matches(sample))
        .map(|i| i.points)
        .sum()
}

/// A metric rule ready for scoring
#[derive(Debug, Clone)]
pub struct CompiledRule {
    base_divisor: f64,
    base_cap: f64,
    indicators: Vec<CompiledIndicator>,
    penalties: Vec<CompiledIndicator>,
}

impl CompiledRule {
    /// Length component of the score
    pub fn base(&self, word_count: usize) -> f64 {
        if self.base_divisor <= 0.0 {
            return 0.0;
        }
        (word_count as f64 / self.base_divisor).min(self.base_cap)
    }

    pub fn bonus(&self, sample: &TextSample<'_>) -> f64 {
        matched_points(&self.indicators, sample)
    }

    pub fn penalty(&self, sample: &TextSample<'_>) -> f64 {
        matched_points(&self.penalties, sample)
    }

    /// Penalty patterns present in the sample
    pub fn matched_penalties<'r>(&'r self, sample: &TextSample<'_>) -> Vec<&'r str> {
        self.penalties
            .iter()
            .filter(|p| p.matches(sample))
            .map(|p| p.label())
            .collect()
    }

    /// Number of indicators present
    pub fn hits(&self, sample: &TextSample<'_>) -> usize {
        self.indicators.iter().filter(|i| i.matches(sample)).count()
    }

    /// `base + bonus - penalty`, clamped to `[0, 100]`
    pub fn score(&self, sample: &TextSample<'_>) -> f64 {
        let raw = self.base(sample.word_count()) + self.bonus(sample) - self.penalty(sample);
        raw.clamp(0.0, 100.0)
    }
}

/// All rules of one task type, compiled
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    task_type: TaskType,
    rules: Vec<CompiledRule>,
    creativity_markers: Vec<CompiledIndicator>,
}

impl CompiledPatterns {
    pub fn task_type(&self) -> TaskType {
        self.task_type
    }

    pub fn rule(&self, metric: Metric) -> &CompiledRule {
        &self.rules[metric.index()]
    }

    pub fn creativity_markers(&self) -> &[CompiledIndicator] {
        &self.creativity_markers
    }

    /// Indicator hits across all seven rules
    pub fn indicator_hits(&self, sample: &TextSample<'_>) -> usize {
        self.rules.iter().map(|r| r.hits(sample)).sum()
    }
}
