//! Multi-metric evaluation of LLM responses
//!
//! This crate scores free-text responses on seven quality metrics, with
//! profiles selected by task category, and tracks the stability of those
//! scores across strategies and over time.
//!
//! # Features
//!
//! - Procedural, creative, analytical and general calculator sets
//! - Configurable profiles, weights and indicator tables (TOML)
//! - Ensemble disagreement detection with small-sample outlier handling
//! - Temporal drift detection with a significance test on the trend
//! - Bounded-concurrency batch evaluation and JSON summaries
//!
//! # Example
//!
//! ```no_run
//! use response_eval::{
//!     config::EvalConfig,
//!     ensemble::DisagreementDetector,
//!     evaluator::Evaluator,
//! };
//!
//! let config = EvalConfig::load_or_default().expect("readable configuration");
//! let evaluator = Evaluator::new(config).expect("valid configuration");
//!
//! let result = evaluator.evaluate("First, check the logs...", Some("linux"));
//! println!("{}: {:.1}", result.profile, result.overall_score);
//!
//! let ensemble = evaluator.evaluate_ensemble(
//!     "First, check the logs...",
//!     Some("linux"),
//!     &evaluator.config().strategies,
//! );
//! let detector = DisagreementDetector::new(evaluator.config().disagreement.clone());
//! let outcome = detector.detect_disagreement(&ensemble).expect("unique strategies");
//! ```

pub mod aggregate;
pub mod analysis;
pub mod config;
pub mod drift;
pub mod ensemble;
pub mod evaluator;
pub mod input;
pub mod metrics;
pub mod profile;
pub mod reporting;
pub mod runner;

pub use config::{ConfigError, EvalConfig};
pub use evaluator::{EvaluationResult, Evaluator};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::analysis::{BatchSummary, LexicalSignals, TextSample};
    pub use crate::config::{ConfigError, EvalConfig};
    pub use crate::drift::{
        DriftDetector, DriftError, DriftReport, DriftStatus, ScoreHistory, ScoreHistoryPoint,
    };
    pub use crate::ensemble::{
        ConsensusError, ConsensusOutcome, ConsensusResult, DisagreementDetector,
        EnsembleEvaluationResult, EvaluationStrategy,
    };
    pub use crate::evaluator::{
        ContextualEvaluation, EvaluationResult, Evaluator, ResponseInput, ScoreLabel,
    };
    pub use crate::metrics::{Metric, MetricSet, MetricWeights};
    pub use crate::profile::{ProfileResolver, TaskProfile, TaskType};
    pub use crate::reporting::{print_console_report, JsonSummary};
    pub use crate::runner::{EvaluationJob, Executor, ExecutorConfig, JobOutcome, JobStatus};
}
