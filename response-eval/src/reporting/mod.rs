//! Results reporting

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::BatchSummary;
use crate::drift::DriftReport;
use crate::ensemble::{ConsensusOutcome, EnsembleEvaluationResult};
use crate::runner::{JobOutcome, JobStatus};

/// A job that produced no score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedJob {
    pub job_id: String,
    pub status: JobStatus,
    pub error: String,
}

/// JSON summary export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonSummary {
    pub run_id: String,
    pub timestamp: String,
    pub total_jobs: usize,
    pub completed: usize,
    pub summary: BatchSummary,
    pub failed_jobs: Vec<FailedJob>,
}

impl JsonSummary {
    /// Summarise a finished batch
    pub fn from_outcomes(
        run_id: impl Into<String>,
        outcomes: &[JobOutcome],
        improvement_threshold: f64,
    ) -> Self {
        let results: Vec<_> = outcomes.iter().filter_map(|o| o.result.clone()).collect();
        let failed_jobs = outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| FailedJob {
                job_id: o.job_id.clone(),
                status: o.status,
                error: o.error.clone().unwrap_or_else(|| "Unknown error".to_string()),
            })
            .collect();

        Self {
            run_id: run_id.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            total_jobs: outcomes.len(),
            completed: results.len(),
            summary: BatchSummary::from_results(&results, improvement_threshold),
            failed_jobs,
        }
    }

    /// Write to JSON file
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, json)
    }
}

/// Generate a console report for a batch run
pub fn print_console_report(summary: &JsonSummary) {
    let stats = &summary.summary;

    println!("\n=== Response Evaluation Results ===\n");
    println!("Run: {}", summary.run_id);
    println!("Jobs: {} ({} scored, {} failed)\n", summary.total_jobs, summary.completed, summary.failed_jobs.len());

    if stats.count > 0 {
        println!("Overall Scores:");
        println!("{:-<50}", "");
        println!("  Mean: {:.1}  Median: {:.1}  Std: {:.1}", stats.mean, stats.median, stats.std_dev);
        println!("  Min: {:.1}  Max: {:.1}", stats.min, stats.max);

        println!("\nMetric Averages:");
        println!("{:-<50}", "");
        for (metric, avg) in &stats.metric_averages {
            println!("  {:<24} {:>6.1}", metric, avg);
        }

        println!("\nLabels:");
        println!("{:-<50}", "");
        for (label, count) in &stats.label_distribution {
            println!("  {}: {}", label, count);
        }

        println!("\nTask Types:");
        println!("{:-<50}", "");
        for (task_type, count) in &stats.task_type_distribution {
            println!("  {}: {}", task_type, count);
        }

        println!("\nTop Performers:");
        println!("{:-<50}", "");
        for (i, top) in stats.top_performers.iter().enumerate() {
            println!("  {}. #{} ({}) - {:.1}", i + 1, top.index, top.profile, top.overall_score);
        }

        println!("\nImprovement Areas:");
        println!("{:-<50}", "");
        for area in &stats.improvement_areas {
            println!("  {}", area);
        }
    }

    if !summary.failed_jobs.is_empty() {
        println!("\nFailed Jobs:");
        println!("{:-<50}", "");
        for failed in &summary.failed_jobs {
            println!("  {} [{}]: {}", failed.job_id, failed.status.as_str(), failed.error);
        }
    }

    println!("\n{:=<50}", "");
}

/// Print per-strategy scores and the consensus verdict
pub fn print_consensus_report(results: &[EnsembleEvaluationResult], outcome: &ConsensusOutcome) {
    println!("\n=== Ensemble Consensus ===\n");

    if !results.is_empty() {
        println!("Strategies:");
        println!("{:-<50}", "");
        for entry in results {
            println!(
                "  {:<18} {:>6.1}  ({}, {})",
                entry.strategy, entry.result.overall_score, entry.result.profile, entry.result.label
            );
        }
        println!();
    }

    match outcome {
        ConsensusOutcome::InsufficientData { strategies, required } => {
            println!("Insufficient data: {} strategies, {} required", strategies, required);
        }
        ConsensusOutcome::Consensus(consensus) => {
            println!("Consensus:");
            println!("{:-<50}", "");
            println!("  Mean: {:.1}  Std: {:.2}  CV: {:.3}", consensus.mean_score, consensus.std_dev, consensus.coefficient_of_variation);
            println!("  Consensus level: {:.2}  Reliability: {:.2}", consensus.consensus_level, consensus.reliability);
            println!("  z threshold: {:.3}", consensus.effective_z_threshold);
            for (strategy, z) in &consensus.z_scores {
                let marker = if consensus.outliers.contains(strategy) { " <- outlier" } else { "" };
                println!("    {:<18} z = {:.3}{}", strategy, z, marker);
            }
            let flags: Vec<&str> = consensus.flags.iter().map(|f| f.as_str()).collect();
            if !flags.is_empty() {
                println!("  Flags: {}", flags.join(", "));
            }
            println!(
                "  Disagreement: {}",
                if consensus.disagreement_flag { "YES" } else { "no" }
            );
        }
    }

    println!("\n{:=<50}", "");
}

/// Print a drift verdict
pub fn print_drift_report(report: &DriftReport) {
    println!("\n=== Score Drift ===\n");
    println!("Status: {}", report.status);
    println!("Points used: {} (minimum {})", report.points_used, report.required);
    if let (Some(start), Some(end)) = (report.window_start, report.window_end) {
        println!("Window: {} .. {}", start.to_rfc3339(), end.to_rfc3339());
    }
    if let Some(fit) = &report.fit {
        println!("{:-<50}", "");
        println!("  Slope: {:+.3} per step", fit.slope);
        println!("  Intercept: {:.2}", fit.intercept);
        println!("  r: {:.3}  r^2: {:.3}", fit.r, fit.r_squared);
        println!("  p-value: {:.4}", fit.p_value);
    }
    println!("\n{:=<50}", "");
}
