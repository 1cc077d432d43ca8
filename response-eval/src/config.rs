//! Evaluator configuration
//!
//! Loads profiles, categories, pattern tables and detector settings from
//! TOML. `EvalConfig::default()` is the complete built-in configuration;
//! a saved file round-trips through `save_toml` / `from_file`.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::ensemble::EvaluationStrategy;
use crate::profile::defaults::{default_profiles, default_strategies};
use crate::profile::{default_categories, PatternTable, ProfileConfig, ProfileResolver, TaskType};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Profile used for unknown or absent categories
    #[serde(default = "default_profile_name")]
    pub default_profile: String,
    #[serde(default)]
    pub thresholds: ScoreThresholds,
    #[serde(default)]
    pub text_analysis: TextAnalysisSettings,
    #[serde(default)]
    pub disagreement: DisagreementSettings,
    #[serde(default)]
    pub drift: DriftSettings,
    #[serde(default)]
    pub runner: RunnerSettings,
    #[serde(default = "default_strategies")]
    pub strategies: Vec<EvaluationStrategy>,
    /// Normalized category -> profile name
    #[serde(default = "default_categories")]
    pub categories: IndexMap<String, String>,
    #[serde(default = "default_profiles")]
    pub profiles: IndexMap<String, ProfileConfig>,
    #[serde(default)]
    pub patterns: PatternTable,
}

/// Score bands used for labels and recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    #[serde(default = "default_excellent")]
    pub excellent: f64,
    #[serde(default = "default_good")]
    pub good: f64,
    #[serde(default = "default_satisfactory")]
    pub satisfactory: f64,
    #[serde(default = "default_poor")]
    pub poor: f64,
    /// Responses shorter than this get proportionally lower confidence
    #[serde(default = "default_minimum_word_count")]
    pub minimum_word_count: usize,
    /// Metrics below this get a recommendation
    #[serde(default = "default_recommendation_threshold")]
    pub recommendation_threshold: f64,
    /// Batch metric averages below this are improvement areas
    #[serde(default = "default_improvement_threshold")]
    pub improvement_threshold: f64,
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            excellent: default_excellent(),
            good: default_good(),
            satisfactory: default_satisfactory(),
            poor: default_poor(),
            minimum_word_count: default_minimum_word_count(),
            recommendation_threshold: default_recommendation_threshold(),
            improvement_threshold: default_improvement_threshold(),
        }
    }
}

/// Analyzer tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextAnalysisSettings {
    #[serde(default = "default_vocabulary_diversity_threshold")]
    pub vocabulary_diversity_threshold: f64,
    /// Indicator hits per 100 words that count as fully dense
    #[serde(default = "default_density_target")]
    pub density_target: f64,
}

impl Default for TextAnalysisSettings {
    fn default() -> Self {
        Self {
            vocabulary_diversity_threshold: default_vocabulary_diversity_threshold(),
            density_target: default_density_target(),
        }
    }
}

/// Ensemble disagreement detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisagreementSettings {
    #[serde(default = "default_outlier_z_threshold")]
    pub outlier_z_threshold: f64,
    /// Caps the z threshold at `ceiling * sqrt(n - 1)` for small ensembles
    #[serde(default = "default_small_sample_ceiling")]
    pub small_sample_ceiling: f64,
    /// Minimum distance from the mean, in points, for an outlier
    #[serde(default = "default_min_outlier_gap")]
    pub min_outlier_gap: f64,
    /// Standard deviation above which disagreement is flagged
    #[serde(default = "default_spread_threshold")]
    pub spread_threshold: f64,
    #[serde(default = "default_consensus_threshold")]
    pub consensus_threshold: f64,
    #[serde(default = "default_high_consensus")]
    pub high_consensus: f64,
}

impl Default for DisagreementSettings {
    fn default() -> Self {
        Self {
            outlier_z_threshold: default_outlier_z_threshold(),
            small_sample_ceiling: default_small_sample_ceiling(),
            min_outlier_gap: default_min_outlier_gap(),
            spread_threshold: default_spread_threshold(),
            consensus_threshold: default_consensus_threshold(),
            high_consensus: default_high_consensus(),
        }
    }
}

/// Temporal drift detection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftSettings {
    #[serde(default = "default_min_history")]
    pub min_history: usize,
    /// Most recent points used for the fit
    #[serde(default = "default_window")]
    pub window: usize,
    /// Points per step
    #[serde(default = "default_slope_threshold")]
    pub slope_threshold: f64,
    #[serde(default = "default_correlation_threshold")]
    pub correlation_threshold: f64,
    #[serde(default = "default_significance")]
    pub significance: f64,
}

impl Default for DriftSettings {
    fn default() -> Self {
        Self {
            min_history: default_min_history(),
            window: default_window(),
            slope_threshold: default_slope_threshold(),
            correlation_threshold: default_correlation_threshold(),
            significance: default_significance(),
        }
    }
}

/// Batch execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunnerSettings {
    #[serde(default = "default_parallel_evaluations")]
    pub parallel_evaluations: usize,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            parallel_evaluations: default_parallel_evaluations(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

// Default value functions
fn default_profile_name() -> String { "general".to_string() }
fn default_excellent() -> f64 { 85.0 }
fn default_good() -> f64 { 70.0 }
fn default_satisfactory() -> f64 { 55.0 }
fn default_poor() -> f64 { 40.0 }
fn default_minimum_word_count() -> usize { 50 }
fn default_recommendation_threshold() -> f64 { 60.0 }
fn default_improvement_threshold() -> f64 { 65.0 }
fn default_vocabulary_diversity_threshold() -> f64 { 0.4 }
fn default_density_target() -> f64 { 8.0 }
fn default_outlier_z_threshold() -> f64 { 1.5 }
fn default_small_sample_ceiling() -> f64 { 0.9 }
fn default_min_outlier_gap() -> f64 { 5.0 }
fn default_spread_threshold() -> f64 { 10.0 }
fn default_consensus_threshold() -> f64 { 0.7 }
fn default_high_consensus() -> f64 { 0.8 }
fn default_min_history() -> usize { 5 }
fn default_window() -> usize { 20 }
fn default_slope_threshold() -> f64 { 0.5 }
fn default_correlation_threshold() -> f64 { 0.8 }
fn default_significance() -> f64 { 0.05 }
fn default_parallel_evaluations() -> usize { 4 }
fn default_timeout_ms() -> u64 { 30_000 }

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            default_profile: default_profile_name(),
            thresholds: ScoreThresholds::default(),
            text_analysis: TextAnalysisSettings::default(),
            disagreement: DisagreementSettings::default(),
            drift: DriftSettings::default(),
            runner: RunnerSettings::default(),
            strategies: default_strategies(),
            categories: default_categories(),
            profiles: default_profiles(),
            patterns: PatternTable::default(),
        }
    }
}

impl EvalConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load from the first default config location that exists, or return
    /// defaults when none does. A config file that exists but fails to load
    /// is an error.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        Self::load_first(&[
            "config/eval.toml",
            "../config/eval.toml",
            "response-eval/config/eval.toml",
        ])
    }

    fn load_first<P: AsRef<Path>>(config_paths: &[P]) -> Result<Self, ConfigError> {
        for path in config_paths {
            let path = path.as_ref();
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded configuration from {}", path.display());
                    return Ok(config);
                }
                Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(ConfigError::Parse(message)) => {
                    return Err(ConfigError::Parse(format!("{}: {}", path.display(), message)));
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!("Using default configuration");
        Ok(Self::default())
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// Check every setting and compile every profile
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.check_settings()?;
        ProfileResolver::from_config(self)?;
        Ok(())
    }

    pub(crate) fn check_settings(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let bands = [t.poor, t.satisfactory, t.good, t.excellent];
        if bands.iter().any(|b| !(0.0..=100.0).contains(b)) || bands.windows(2).any(|w| w[0] > w[1])
        {
            return Err(invalid(
                "thresholds",
                "score bands must be within 0..=100 and ordered poor <= satisfactory <= good <= excellent",
            ));
        }
        if t.minimum_word_count == 0 {
            return Err(invalid("thresholds.minimum_word_count", "must be at least 1"));
        }
        check_range("thresholds.recommendation_threshold", t.recommendation_threshold, 0.0, 100.0)?;
        check_range("thresholds.improvement_threshold", t.improvement_threshold, 0.0, 100.0)?;

        let a = &self.text_analysis;
        check_positive("text_analysis.vocabulary_diversity_threshold", a.vocabulary_diversity_threshold)?;
        check_positive("text_analysis.density_target", a.density_target)?;

        let d = &self.disagreement;
        check_positive("disagreement.outlier_z_threshold", d.outlier_z_threshold)?;
        check_positive("disagreement.small_sample_ceiling", d.small_sample_ceiling)?;
        check_range("disagreement.min_outlier_gap", d.min_outlier_gap, 0.0, 100.0)?;
        check_range("disagreement.spread_threshold", d.spread_threshold, 0.0, 100.0)?;
        check_range("disagreement.consensus_threshold", d.consensus_threshold, 0.0, 1.0)?;
        check_range("disagreement.high_consensus", d.high_consensus, 0.0, 1.0)?;

        let dr = &self.drift;
        if dr.min_history < 3 {
            return Err(invalid("drift.min_history", "a trend needs at least 3 points"));
        }
        if dr.window < dr.min_history {
            return Err(invalid("drift.window", "must not be smaller than drift.min_history"));
        }
        check_range("drift.slope_threshold", dr.slope_threshold, 0.0, f64::MAX)?;
        check_range("drift.correlation_threshold", dr.correlation_threshold, 0.0, 1.0)?;
        if !(dr.significance > 0.0 && dr.significance < 1.0) {
            return Err(invalid("drift.significance", "must be within (0, 1)"));
        }

        if self.runner.parallel_evaluations == 0 {
            return Err(invalid("runner.parallel_evaluations", "must be at least 1"));
        }
        if self.runner.timeout_ms == 0 {
            return Err(invalid("runner.timeout_ms", "must be at least 1"));
        }

        let mut labels = std::collections::BTreeSet::new();
        for strategy in &self.strategies {
            if !labels.insert(strategy.label.as_str()) {
                return Err(invalid("strategies", &format!("duplicate label '{}'", strategy.label)));
            }
            if !strategy.scoring_bias.is_finite() {
                return Err(invalid("strategies", &format!("'{}' has a non-finite bias", strategy.label)));
            }
            if let Some(profile) = &strategy.profile {
                if !self.profiles.contains_key(profile) {
                    return Err(ConfigError::UnknownProfile {
                        category: format!("strategy:{}", strategy.label),
                        profile: profile.clone(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Profile names in configuration order
    pub fn profile_names(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        message: message.to_string(),
    }
}

fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(invalid(field, &format!("{} is outside {}..={}", value, min, max)))
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, &format!("must be a positive number, got {}", value)))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("profile '{profile}': weights sum to {sum}, expected 1.0")]
    WeightSum { profile: String, sum: f64 },

    #[error("profile '{profile}': missing weight for '{metric}'")]
    MissingMetric { profile: String, metric: String },

    #[error("profile '{profile}': unknown metric '{metric}'")]
    UnknownMetric { profile: String, metric: String },

    #[error("profile '{profile}': invalid weight {weight} for '{metric}'")]
    InvalidWeight {
        profile: String,
        metric: String,
        weight: f64,
    },

    #[error("'{category}' refers to unknown profile '{profile}'")]
    UnknownProfile { category: String, profile: String },

    #[error("default profile '{0}' is not defined")]
    MissingDefaultProfile(String),

    #[error("{task_type} pattern '{pattern}': {message}")]
    Pattern {
        task_type: TaskType,
        pattern: String,
        message: String,
    },

    #[error("invalid setting {field}: {message}")]
    Invalid { field: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EvalConfig::default();
        config.validate().unwrap();
        assert_eq!(config.default_profile, "general");
        assert!(config.profiles.contains_key("procedural"));
        assert_eq!(config.strategies.len(), 5);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
default_profile = "analytical"

[disagreement]
outlier_z_threshold = 2.0

[drift]
window = 30
"#;
        let config = EvalConfig::from_toml(toml).unwrap();
        assert_eq!(config.default_profile, "analytical");
        assert_eq!(config.disagreement.outlier_z_threshold, 2.0);
        assert_eq!(config.disagreement.spread_threshold, 10.0);
        assert_eq!(config.drift.window, 30);
        assert_eq!(config.drift.min_history, 5);
        assert_eq!(config.profiles.len(), 10);
        config.validate().unwrap();
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("eval.toml");

        let config = EvalConfig::default();
        config.save_toml(&path).unwrap();
        let loaded = EvalConfig::from_file(&path).unwrap();

        assert_eq!(loaded, config);
        assert_eq!(
            loaded.profile_names(),
            config.profile_names(),
            "profile order survives a round trip"
        );
    }

    #[test]
    fn test_weight_violation_is_fatal() {
        let mut config = EvalConfig::default();
        let mut lopsided = config.profiles["general"].clone();
        lopsided.weights.insert("completeness".to_string(), 0.5);
        config.profiles.insert("lopsided".to_string(), lopsided);

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::WeightSum { .. }), "{}", err);
    }

    #[test]
    fn test_profile_table_from_toml() {
        let toml = r#"
default_profile = "terse"
strategies = []

[categories]
summary = "terse"

[profiles.terse]
task_type = "general"

[profiles.terse.weights]
organization_quality = 0.4
technical_accuracy = 0.3
completeness = 0.3
thoroughness = 0.0
reliability = 0.0
scope_coverage = 0.0
domain_appropriateness = 0.0
"#;
        let config = EvalConfig::from_toml(toml).unwrap();
        config.validate().unwrap();
        assert_eq!(config.profile_names(), vec!["terse"]);
    }

    #[test]
    fn test_invalid_thresholds() {
        let mut config = EvalConfig::default();
        config.thresholds.good = 90.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        let mut config = EvalConfig::default();
        config.drift.significance = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_regex_is_fatal() {
        let mut config = EvalConfig::default();
        config
            .patterns
            .general
            .completeness
            .indicators
            .push(crate::profile::Indicator::regex("(unclosed", 5.0));
        assert!(matches!(config.validate(), Err(ConfigError::Pattern { .. })));
    }

    #[test]
    fn test_load_first_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let present = dir.path().join("eval.toml");
        EvalConfig::default().save_toml(&present).unwrap();

        let config = EvalConfig::load_first(&[&missing, &present]).unwrap();
        assert_eq!(config.default_profile, EvalConfig::default().default_profile);

        let config = EvalConfig::load_first(&[&missing]).unwrap();
        assert_eq!(config.profiles.len(), EvalConfig::default().profiles.len());
    }

    #[test]
    fn test_load_first_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("eval.toml");
        std::fs::write(&bad, "[thresholds]\nexcellent = \"high\"\n").unwrap();
        let fallback = dir.path().join("fallback.toml");
        EvalConfig::default().save_toml(&fallback).unwrap();

        let err = EvalConfig::load_first(&[&bad, &fallback]).unwrap_err();
        match err {
            ConfigError::Parse(message) => assert!(message.contains("eval.toml")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = EvalConfig::from_file("/nonexistent/eval.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
