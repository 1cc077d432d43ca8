//! Batch statistics over evaluation results

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::aggregate::round1;
use crate::evaluator::EvaluationResult;
use crate::metrics::Metric;

/// Number of entries in [`BatchSummary::top_performers`]
pub const TOP_PERFORMERS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPerformer {
    /// Position of the result in the batch
    pub index: usize,
    pub profile: String,
    pub overall_score: f64,
}

/// Aggregate view of a batch of evaluations
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub metric_averages: IndexMap<String, f64>,
    pub label_distribution: BTreeMap<String, usize>,
    pub task_type_distribution: BTreeMap<String, usize>,
    pub top_performers: Vec<TopPerformer>,
    pub improvement_areas: Vec<String>,
}

impl BatchSummary {
    pub fn from_results(results: &[EvaluationResult], improvement_threshold: f64) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let scores: Vec<f64> = results.iter().map(|r| r.overall_score).collect();
        let n = scores.len() as f64;
        let mean = scores.iter().sum::<f64>() / n;
        let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        let mut metric_averages = IndexMap::new();
        let mut improvement_areas = Vec::new();
        for metric in Metric::ALL {
            let avg = results.iter().map(|r| r.metrics.get(metric)).sum::<f64>() / n;
            let avg = round1(avg);
            if avg < improvement_threshold {
                improvement_areas.push(format!("{}: {:.1}", metric.display_name(), avg));
            }
            metric_averages.insert(metric.as_str().to_string(), avg);
        }
        if improvement_areas.is_empty() {
            improvement_areas.push("All metrics performing well".to_string());
        }

        let mut label_distribution = BTreeMap::new();
        let mut task_type_distribution = BTreeMap::new();
        for result in results {
            *label_distribution.entry(result.label.as_str().to_string()).or_insert(0) += 1;
            *task_type_distribution
                .entry(result.task_type.as_str().to_string())
                .or_insert(0) += 1;
        }

        let mut ranked: Vec<(usize, &EvaluationResult)> = results.iter().enumerate().collect();
        // Stable sort keeps batch order among equal scores
        ranked.sort_by(|a, b| {
            b.1.overall_score
                .partial_cmp(&a.1.overall_score)
                .unwrap_or(Ordering::Equal)
        });
        let top_performers = ranked
            .into_iter()
            .take(TOP_PERFORMERS)
            .map(|(index, r)| TopPerformer {
                index,
                profile: r.profile.clone(),
                overall_score: r.overall_score,
            })
            .collect();

        Self {
            count: results.len(),
            mean: round1(mean),
            median: round1(median),
            std_dev: round1(variance.sqrt()),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            metric_averages,
            label_distribution,
            task_type_distribution,
            top_performers,
            improvement_areas,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreThresholds;
    use crate::evaluator::{ReasoningIndicators, ScoreLabel};
    use crate::metrics::MetricSet;
    use crate::profile::TaskType;
    use chrono::Utc;

    fn result(score: f64, task_type: TaskType) -> EvaluationResult {
        EvaluationResult {
            metrics: MetricSet::from_values([score; 7], 100, 50.0),
            overall_score: score,
            task_type,
            profile: task_type.as_str().to_string(),
            label: ScoreLabel::from_score(score, &ScoreThresholds::default()),
            rationale: String::new(),
            recommendations: Vec::new(),
            indicators: ReasoningIndicators::default(),
            signals: None,
            defects: Vec::new(),
            pattern_version: 1,
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn test_empty_batch() {
        assert_eq!(BatchSummary::from_results(&[], 65.0), BatchSummary::default());
    }

    #[test]
    fn test_statistics() {
        let results = vec![
            result(90.0, TaskType::Procedural),
            result(60.0, TaskType::Creative),
            result(70.0, TaskType::Creative),
            result(80.0, TaskType::General),
        ];
        let summary = BatchSummary::from_results(&results, 65.0);

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, 75.0);
        assert_eq!(summary.median, 75.0);
        assert_eq!(summary.std_dev, 11.2);
        assert_eq!(summary.min, 60.0);
        assert_eq!(summary.max, 90.0);
        assert_eq!(summary.metric_averages["reliability"], 75.0);
        assert_eq!(summary.task_type_distribution["creative"], 2);
        assert_eq!(summary.label_distribution["excellent"], 1);
        assert_eq!(summary.top_performers[0].index, 0);
        assert_eq!(summary.top_performers[1].overall_score, 80.0);
        assert_eq!(summary.improvement_areas, vec!["All metrics performing well"]);
    }

    #[test]
    fn test_improvement_areas_and_top_five() {
        let results: Vec<_> = (0..8).map(|i| result(40.0 + i as f64, TaskType::General)).collect();
        let summary = BatchSummary::from_results(&results, 65.0);

        assert_eq!(summary.top_performers.len(), TOP_PERFORMERS);
        assert_eq!(summary.top_performers[0].index, 7);
        assert_eq!(summary.improvement_areas.len(), 7);
        assert_eq!(summary.improvement_areas[0], "Organization Quality: 43.5");
        assert_eq!(summary.median, 43.5);
    }
}
