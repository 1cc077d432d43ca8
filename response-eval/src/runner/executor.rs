//! Bounded-concurrency batch evaluation

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use crate::config::RunnerSettings;
use crate::evaluator::{EvaluationResult, Evaluator};

/// Configuration for the executor
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum evaluations running at once
    pub parallel_evaluations: usize,
    /// Wall-clock limit per evaluation in milliseconds
    pub timeout_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::from(&RunnerSettings::default())
    }
}

impl From<&RunnerSettings> for ExecutorConfig {
    fn from(settings: &RunnerSettings) -> Self {
        Self {
            parallel_evaluations: settings.parallel_evaluations,
            timeout_ms: settings.timeout_ms,
        }
    }
}

/// A response queued for evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationJob {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl EvaluationJob {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Completed,
    TimedOut,
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Completed => "completed",
            JobStatus::TimedOut => "timed_out",
            JobStatus::Failed => "failed",
        }
    }
}

/// Result of one job. Failed and timed out jobs carry no score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<EvaluationResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

impl JobOutcome {
    fn completed(job_id: String, result: EvaluationResult, elapsed_ms: u64) -> Self {
        Self {
            job_id,
            status: JobStatus::Completed,
            result: Some(result),
            error: None,
            elapsed_ms,
        }
    }

    fn failure(job_id: String, status: JobStatus, error: String, elapsed_ms: u64) -> Self {
        Self {
            job_id,
            status,
            result: None,
            error: Some(error),
            elapsed_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == JobStatus::Completed
    }
}

/// Scores one job. Implemented by [`Evaluator`].
pub trait ResponseScorer: Send + Sync {
    fn score(&self, job: &EvaluationJob) -> EvaluationResult;
}

impl ResponseScorer for Evaluator {
    fn score(&self, job: &EvaluationJob) -> EvaluationResult {
        self.evaluate(&job.text, job.category.as_deref())
    }
}

/// Runs evaluation jobs on the blocking pool
pub struct Executor {
    config: ExecutorConfig,
    scorer: Arc<dyn ResponseScorer>,
    semaphore: Arc<Semaphore>,
    progress: Arc<dyn ProgressCallback>,
}

impl Executor {
    pub fn new(scorer: Arc<dyn ResponseScorer>, config: ExecutorConfig) -> Self {
        let semaphore = Arc::new(Semaphore::new(config.parallel_evaluations.max(1)));
        Self {
            config,
            scorer,
            semaphore,
            progress: Arc::new(NoOpProgress),
        }
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Evaluate all jobs, returning outcomes in input order
    pub async fn evaluate_batch(&self, jobs: Vec<EvaluationJob>) -> Vec<JobOutcome> {
        let total = jobs.len();
        let completed = Arc::new(AtomicUsize::new(0));
        let timeout = Duration::from_millis(self.config.timeout_ms);

        let mut handles = Vec::with_capacity(total);
        for job in jobs {
            let job_id = job.id.clone();
            let scorer = Arc::clone(&self.scorer);
            let semaphore = Arc::clone(&self.semaphore);
            let progress = Arc::clone(&self.progress);
            let completed = Arc::clone(&completed);
            let timeout_ms = self.config.timeout_ms;

            let handle = tokio::spawn(async move {
                let permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(e) => {
                        return JobOutcome::failure(job.id, JobStatus::Failed, e.to_string(), 0);
                    }
                };

                progress.on_job_start(&job.id);
                let start = Instant::now();
                let id = job.id.clone();
                // the permit is held until the scorer returns, even after a timeout
                let work = tokio::task::spawn_blocking(move || {
                    let _permit = permit;
                    scorer.score(&job)
                });

                let outcome = match tokio::time::timeout(timeout, work).await {
                    Ok(Ok(result)) => {
                        JobOutcome::completed(id, result, start.elapsed().as_millis() as u64)
                    }
                    Ok(Err(e)) => {
                        tracing::error!("Evaluation of {} failed: {}", id, e);
                        let elapsed = start.elapsed().as_millis() as u64;
                        JobOutcome::failure(id, JobStatus::Failed, format!("evaluation failed: {}", e), elapsed)
                    }
                    Err(_) => {
                        tracing::warn!("Evaluation of {} timed out after {}ms", id, timeout_ms);
                        let elapsed = start.elapsed().as_millis() as u64;
                        JobOutcome::failure(
                            id,
                            JobStatus::TimedOut,
                            format!("timed out after {}ms", timeout_ms),
                            elapsed,
                        )
                    }
                };

                progress.on_job_complete(&outcome.job_id, outcome.status);
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                progress.on_progress(done, total);
                outcome
            });

            handles.push((job_id, handle));
        }

        let mut outcomes = Vec::with_capacity(total);
        for (job_id, handle) in handles {
            match handle.await {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    tracing::error!("Job {} panicked: {}", job_id, e);
                    outcomes.push(JobOutcome::failure(job_id, JobStatus::Failed, e.to_string(), 0));
                }
            }
        }

        outcomes
    }
}

/// Progress callback for tracking execution
pub trait ProgressCallback: Send + Sync {
    fn on_job_start(&self, job_id: &str);
    fn on_job_complete(&self, job_id: &str, status: JobStatus);
    fn on_progress(&self, completed: usize, total: usize);
}

/// Default no-op progress callback
pub struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_job_start(&self, _job_id: &str) {}
    fn on_job_complete(&self, _job_id: &str, _status: JobStatus) {}
    fn on_progress(&self, _completed: usize, _total: usize) {}
}

/// Console progress callback
pub struct ConsoleProgress;

impl ProgressCallback for ConsoleProgress {
    fn on_job_start(&self, job_id: &str) {
        println!("  Evaluating {}...", job_id);
    }

    fn on_job_complete(&self, job_id: &str, status: JobStatus) {
        let label = match status {
            JobStatus::Completed => "OK",
            JobStatus::TimedOut => "TIMEOUT",
            JobStatus::Failed => "FAILED",
        };
        println!("  {} {}", label, job_id);
    }

    fn on_progress(&self, completed: usize, total: usize) {
        println!("Progress: {}/{} jobs complete", completed, total);
    }
}
