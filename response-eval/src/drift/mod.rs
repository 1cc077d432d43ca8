//! Temporal drift detection over aggregated scores
//!
//! A least squares trend is fitted to the most recent window of a score
//! history. Drift is reported only when the slope is steep, the fit is
//! tight and the slope is significant under Student's t.

pub mod statistical;

pub use statistical::{linear_regression, t_test_p_value, LinearFit};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::DriftSettings;
use crate::ensemble::ConsensusResult;

/// One aggregated score at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreHistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub score: f64,
}

impl ScoreHistoryPoint {
    pub fn new(timestamp: DateTime<Utc>, score: f64) -> Self {
        Self { timestamp, score }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftStatus {
    SystematicInflation,
    SystematicDeflation,
    NoDrift,
    InsufficientData,
}

impl DriftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DriftStatus::SystematicInflation => "systematic_inflation",
            DriftStatus::SystematicDeflation => "systematic_deflation",
            DriftStatus::NoDrift => "no_drift",
            DriftStatus::InsufficientData => "insufficient_data",
        }
    }

    pub fn is_drift(&self) -> bool {
        matches!(
            self,
            DriftStatus::SystematicInflation | DriftStatus::SystematicDeflation
        )
    }
}

impl std::fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trend line over the analysed window, x being the step index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendFit {
    pub slope: f64,
    pub intercept: f64,
    pub r: f64,
    pub r_squared: f64,
    pub p_value: f64,
    pub std_err: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub status: DriftStatus,
    pub points_used: usize,
    /// Minimum history length for a verdict
    pub required: usize,
    pub window_start: Option<DateTime<Utc>>,
    pub window_end: Option<DateTime<Utc>>,
    pub fit: Option<TrendFit>,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriftError {
    #[error("History timestamps must be strictly increasing (point {index})")]
    UnorderedHistory { index: usize },

    #[error("History score at point {index} is not finite")]
    NonFiniteScore { index: usize },
}

fn check_point(
    previous: Option<&ScoreHistoryPoint>,
    point: &ScoreHistoryPoint,
    index: usize,
) -> Result<(), DriftError> {
    if !point.score.is_finite() {
        return Err(DriftError::NonFiniteScore { index });
    }
    if let Some(prev) = previous {
        if point.timestamp <= prev.timestamp {
            return Err(DriftError::UnorderedHistory { index });
        }
    }
    Ok(())
}

/// Append-only score history shared between writers and analysers
#[derive(Debug, Default)]
pub struct ScoreHistory {
    points: RwLock<Vec<ScoreHistoryPoint>>,
}

impl ScoreHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a history from existing points, validating their order
    pub fn from_points(points: Vec<ScoreHistoryPoint>) -> Result<Self, DriftError> {
        for (index, point) in points.iter().enumerate() {
            check_point(index.checked_sub(1).map(|i| &points[i]), point, index)?;
        }
        Ok(Self {
            points: RwLock::new(points),
        })
    }

    pub fn append(&self, point: ScoreHistoryPoint) -> Result<(), DriftError> {
        let mut points = self.points.write();
        check_point(points.last(), &point, points.len())?;
        points.push(point);
        Ok(())
    }

    /// Append the mean score of an ensemble
    pub fn record(&self, consensus: &ConsensusResult, at: DateTime<Utc>) -> Result<(), DriftError> {
        self.append(ScoreHistoryPoint::new(at, consensus.mean_score))
    }

    pub fn snapshot(&self) -> Vec<ScoreHistoryPoint> {
        self.points.read().clone()
    }

    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DriftDetector {
    settings: DriftSettings,
}

impl DriftDetector {
    pub fn new(settings: DriftSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DriftSettings {
        &self.settings
    }

    pub fn detect_drift_in(&self, history: &ScoreHistory) -> Result<DriftReport, DriftError> {
        self.detect_drift(&history.snapshot())
    }

    pub fn detect_drift(&self, history: &[ScoreHistoryPoint]) -> Result<DriftReport, DriftError> {
        for (index, point) in history.iter().enumerate() {
            check_point(index.checked_sub(1).map(|i| &history[i]), point, index)?;
        }

        let required = self.settings.min_history;
        let window_len = self.settings.window.max(2).min(history.len());
        let window = &history[history.len() - window_len..];

        let mut report = DriftReport {
            status: DriftStatus::InsufficientData,
            points_used: window.len(),
            required,
            window_start: window.first().map(|p| p.timestamp),
            window_end: window.last().map(|p| p.timestamp),
            fit: None,
        };

        if history.len() < required {
            tracing::debug!(points = history.len(), required, "history too short for drift");
            return Ok(report);
        }

        let xs: Vec<f64> = (0..window.len()).map(|i| i as f64).collect();
        let ys: Vec<f64> = window.iter().map(|p| p.score).collect();

        let Some(fit) = linear_regression(&xs, &ys) else {
            report.status = DriftStatus::NoDrift;
            return Ok(report);
        };

        let p_value = if fit.slope == 0.0 {
            1.0
        } else if fit.std_err == 0.0 {
            0.0
        } else {
            t_test_p_value(fit.slope / fit.std_err, window.len() as f64 - 2.0)
        };

        let trending = fit.r.abs() >= self.settings.correlation_threshold
            && p_value < self.settings.significance;
        report.status = if trending && fit.slope > self.settings.slope_threshold {
            DriftStatus::SystematicInflation
        } else if trending && fit.slope < -self.settings.slope_threshold {
            DriftStatus::SystematicDeflation
        } else {
            DriftStatus::NoDrift
        };
        report.fit = Some(TrendFit {
            slope: fit.slope,
            intercept: fit.intercept,
            r: fit.r,
            r_squared: fit.r_squared,
            p_value,
            std_err: fit.std_err,
        });

        if report.status.is_drift() {
            tracing::warn!(
                status = %report.status,
                slope = fit.slope,
                r = fit.r,
                p_value,
                "score drift detected"
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::Arc;

    fn history(scores: &[f64]) -> Vec<ScoreHistoryPoint> {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| ScoreHistoryPoint::new(start + Duration::hours(i as i64), *s))
            .collect()
    }

    fn detect(scores: &[f64]) -> DriftReport {
        DriftDetector::default().detect_drift(&history(scores)).unwrap()
    }

    #[test]
    fn test_inflation() {
        let scores: Vec<f64> = (70..80).map(|s| s as f64).collect();
        let report = detect(&scores);
        assert_eq!(report.status, DriftStatus::SystematicInflation);
        let fit = report.fit.unwrap();
        assert!((fit.slope - 1.0).abs() < 1e-12);
        assert!((fit.r - 1.0).abs() < 1e-12);
        assert_eq!(fit.p_value, 0.0);
        assert_eq!(report.points_used, 10);
    }

    #[test]
    fn test_deflation_with_noise() {
        let scores = [90.0, 88.5, 86.0, 85.5, 82.0, 81.0, 78.5, 77.0];
        let report = detect(&scores);
        assert_eq!(report.status, DriftStatus::SystematicDeflation);
        assert!(report.fit.unwrap().p_value < 0.05);
    }

    #[test]
    fn test_flat_history() {
        let report = detect(&[75.0; 8]);
        assert_eq!(report.status, DriftStatus::NoDrift);
        let fit = report.fit.unwrap();
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.p_value, 1.0);
    }

    #[test]
    fn test_noise_is_not_drift() {
        let report = detect(&[70.0, 74.0, 69.0, 75.0, 71.0, 73.0, 70.0, 74.0]);
        assert_eq!(report.status, DriftStatus::NoDrift);
    }

    #[test]
    fn test_shallow_trend_is_not_drift() {
        let rising: Vec<f64> = (0..10).map(|i| 70.0 + 0.3 * i as f64).collect();
        let report = detect(&rising);
        assert_eq!(report.status, DriftStatus::NoDrift);
        let fit = report.fit.unwrap();
        assert!(fit.r > 0.99);
        assert!(fit.p_value < 0.05);
        assert!((fit.slope - 0.3).abs() < 1e-9);

        let falling: Vec<f64> = (0..10).map(|i| 80.0 - 0.3 * i as f64).collect();
        let report = detect(&falling);
        assert_eq!(report.status, DriftStatus::NoDrift);
        let fit = report.fit.unwrap();
        assert!(fit.r < -0.99);
        assert!(fit.p_value < 0.05);
    }

    #[test]
    fn test_short_history() {
        let report = detect(&[70.0, 80.0, 90.0]);
        assert_eq!(report.status, DriftStatus::InsufficientData);
        assert_eq!(report.required, 5);
        assert!(report.fit.is_none());

        let empty = detect(&[]);
        assert_eq!(empty.status, DriftStatus::InsufficientData);
        assert_eq!(empty.points_used, 0);
        assert!(empty.window_start.is_none());
    }

    #[test]
    fn test_window_uses_recent_points() {
        // long flat run followed by a steady climb
        let mut scores = vec![60.0; 30];
        scores.extend((0..20).map(|i| 60.0 + 2.0 * i as f64));
        let points = history(&scores);
        let report = DriftDetector::default().detect_drift(&points).unwrap();
        assert_eq!(report.points_used, 20);
        assert_eq!(report.window_start, Some(points[30].timestamp));
        assert_eq!(report.status, DriftStatus::SystematicInflation);
    }

    #[test]
    fn test_unordered_history_rejected() {
        let mut points = history(&[70.0, 71.0, 72.0, 73.0, 74.0]);
        points[3].timestamp = points[2].timestamp;
        let err = DriftDetector::default().detect_drift(&points).unwrap_err();
        assert_eq!(err, DriftError::UnorderedHistory { index: 3 });
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = DriftDetector::default()
            .detect_drift(&history(&[70.0, f64::NAN]))
            .unwrap_err();
        assert_eq!(err, DriftError::NonFiniteScore { index: 1 });
    }

    #[test]
    fn test_history_append_rejects_stale_points() {
        let store = ScoreHistory::new();
        let points = history(&[70.0, 71.0]);
        store.append(points[1]).unwrap();
        assert_eq!(
            store.append(points[0]),
            Err(DriftError::UnorderedHistory { index: 1 })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_history_concurrent_appends() {
        let store = Arc::new(ScoreHistory::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        let mut at = Utc::now();
                        // retry until our timestamp is newer than the last one
                        while store.append(ScoreHistoryPoint::new(at, 70.0)).is_err() {
                            at += Duration::microseconds(1);
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 100);
        assert!(snapshot.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert!(ScoreHistory::from_points(snapshot).is_ok());
    }

    #[test]
    fn test_detect_drift_in_history() {
        let store = ScoreHistory::from_points(history(&[80.0, 78.0, 76.0, 74.0, 72.0, 70.0])).unwrap();
        let report = DriftDetector::default().detect_drift_in(&store).unwrap();
        assert_eq!(report.status, DriftStatus::SystematicDeflation);
    }
}
