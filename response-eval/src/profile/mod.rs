//! Task profiles and category resolution
//!
//! A profile pairs a task type (which selects the calculator set and the
//! pattern dictionary) with a weight vector. Profiles are compiled once from
//! [`EvalConfig`] and shared behind `Arc` for the lifetime of the evaluator.

pub mod categories;
pub mod defaults;
pub mod patterns;

pub use categories::{default_categories, match_category, normalize_category, TaskType};
pub use patterns::{
    CompiledIndicator, CompiledPatterns, CompiledRule, Indicator, MatchKind, MetricRule,
    PatternSet, PatternTable, ReasoningLexicon,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::{ConfigError, EvalConfig};
use crate::metrics::MetricWeights;

/// Profile definition as written in configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub task_type: TaskType,
    /// Metric name to weight; all seven metrics, summing to 1.0
    pub weights: IndexMap<String, f64>,
    /// Extra domain indicators, scored by the analytical calculators
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub emphasis: Vec<Indicator>,
    #[serde(default)]
    pub description: String,
}

/// A resolved, immutable profile
#[derive(Debug)]
pub struct TaskProfile {
    pub name: String,
    pub task_type: TaskType,
    pub weights: MetricWeights,
    pub patterns: Arc<CompiledPatterns>,
    pub emphasis: Vec<CompiledIndicator>,
    pub description: String,
}

/// Maps categories onto compiled profiles
#[derive(Debug)]
pub struct ProfileResolver {
    profiles: IndexMap<String, Arc<TaskProfile>>,
    categories: IndexMap<String, String>,
    default_profile: Arc<TaskProfile>,
}

impl ProfileResolver {
    /// Compile every profile in the configuration.
    ///
    /// Fails on bad weights, invalid patterns, dangling category entries and
    /// a missing default profile.
    pub fn from_config(config: &EvalConfig) -> Result<Self, ConfigError> {
        let mut compiled: BTreeMap<TaskType, Arc<CompiledPatterns>> = BTreeMap::new();
        for task_type in TaskType::all() {
            let patterns = config.patterns.get(task_type).compile(task_type)?;
            compiled.insert(task_type, Arc::new(patterns));
        }

        let mut profiles = IndexMap::new();
        for (name, profile) in &config.profiles {
            let weights = MetricWeights::from_map(name, &profile.weights)?;
            let emphasis = profile
                .emphasis
                .iter()
                .map(|i| i.compile(profile.task_type))
                .collect::<Result<Vec<_>, _>>()?;
            let patterns = compiled
                .get(&profile.task_type)
                .cloned()
                .ok_or_else(|| ConfigError::Invalid {
                    field: format!("profiles.{}.task_type", name),
                    message: "no pattern set for task type".to_string(),
                })?;

            profiles.insert(
                name.clone(),
                Arc::new(TaskProfile {
                    name: name.clone(),
                    task_type: profile.task_type,
                    weights,
                    patterns,
                    emphasis,
                    description: profile.description.clone(),
                }),
            );
        }

        let mut categories = IndexMap::new();
        for (category, profile) in &config.categories {
            if !profiles.contains_key(profile) {
                return Err(ConfigError::UnknownProfile {
                    category: category.clone(),
                    profile: profile.clone(),
                });
            }
            categories.insert(normalize_category(category), profile.clone());
        }

        let default_profile = profiles
            .get(&config.default_profile)
            .cloned()
            .ok_or_else(|| ConfigError::MissingDefaultProfile(config.default_profile.clone()))?;

        tracing::debug!(
            profiles = profiles.len(),
            categories = categories.len(),
            pattern_version = config.patterns.version,
            "compiled profiles"
        );

        Ok(Self {
            profiles,
            categories,
            default_profile,
        })
    }

    /// Resolve a category to its profile, falling back to the default
    pub fn resolve_profile(&self, category: Option<&str>) -> Arc<TaskProfile> {
        let Some(category) = category else {
            return Arc::clone(&self.default_profile);
        };

        let normalized = normalize_category(category);
        match match_category(&self.categories, &normalized).and_then(|p| self.profiles.get(p)) {
            Some(profile) => Arc::clone(profile),
            None => {
                tracing::debug!(category, "no profile for category, using default");
                Arc::clone(&self.default_profile)
            }
        }
    }

    /// Look a profile up by name
    pub fn profile(&self, name: &str) -> Option<Arc<TaskProfile>> {
        self.profiles.get(name).cloned()
    }

    pub fn default_profile(&self) -> &Arc<TaskProfile> {
        &self.default_profile
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Arc<TaskProfile>> {
        self.profiles.values()
    }

    pub fn categories(&self) -> &IndexMap<String, String> {
        &self.categories
    }
}
