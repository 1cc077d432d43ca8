//! Batch evaluation engine

pub mod executor;

pub use executor::{
    ConsoleProgress, EvaluationJob, Executor, ExecutorConfig, JobOutcome, JobStatus, NoOpProgress,
    ProgressCallback, ResponseScorer,
};
