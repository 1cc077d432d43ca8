//! Response Evaluation CLI

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use response_eval::{
    config::EvalConfig,
    drift::{DriftDetector, ScoreHistory},
    ensemble::{ConsensusOutcome, DisagreementDetector},
    evaluator::Evaluator,
    input::{load_ensemble, load_history, load_jobs, read_text},
    reporting::{print_consensus_report, print_console_report, print_drift_report, JsonSummary},
    runner::{ConsoleProgress, Executor, ExecutorConfig},
};

#[derive(Parser)]
#[command(name = "response-eval")]
#[command(about = "Multi-metric scoring, ensemble disagreement and drift detection for LLM responses")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a single response and print the result as JSON
    Score {
        /// File containing the response
        #[arg(short, long, conflicts_with = "text", required_unless_present = "text")]
        file: Option<PathBuf>,

        /// Response text
        #[arg(short, long)]
        text: Option<String>,

        /// Task category used to select the profile
        #[arg(long)]
        category: Option<String>,

        /// Print single-line JSON
        #[arg(long)]
        compact: bool,
    },

    /// Evaluate a batch of jobs
    Evaluate {
        /// JSON file with the jobs
        #[arg(short, long)]
        input: PathBuf,

        /// Number of parallel evaluations
        #[arg(long)]
        parallel: Option<usize>,

        /// Per-evaluation timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Write the JSON summary here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print per-job progress
        #[arg(long)]
        progress: bool,
    },

    /// Score a response under every configured strategy
    Ensemble {
        /// File containing the response
        #[arg(short, long)]
        file: PathBuf,

        /// Task category used to select the profile
        #[arg(long)]
        category: Option<String>,

        /// Save the per-strategy results as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Append the consensus mean to this history file
        #[arg(long)]
        record: Option<PathBuf>,
    },

    /// Run disagreement detection over saved ensemble results
    Consensus {
        /// JSON file with ensemble results
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Detect drift in a score history
    Drift {
        /// JSON file with the score history
        #[arg(short, long)]
        input: PathBuf,
    },

    /// List profiles and the category table
    Profiles,

    /// Generate sample configuration
    InitConfig {
        /// Output path for configuration file
        #[arg(short, long, default_value = "config/eval.toml")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("response_eval=debug,info")
    } else {
        EnvFilter::new("response_eval=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Score {
            file,
            text,
            category,
            compact,
        } => {
            let evaluator = load_evaluator(cli.config.as_deref())?;
            score(&evaluator, file, text, category, compact)?;
        }

        Commands::Evaluate {
            input,
            parallel,
            timeout_ms,
            output,
            progress,
        } => {
            let evaluator = load_evaluator(cli.config.as_deref())?;
            run_batch(evaluator, input, parallel, timeout_ms, output, progress).await?;
        }

        Commands::Ensemble {
            file,
            category,
            output,
            record,
        } => {
            let evaluator = load_evaluator(cli.config.as_deref())?;
            run_ensemble(&evaluator, file, category, output, record)?;
        }

        Commands::Consensus { input } => {
            let config = load_config(cli.config.as_deref())?;
            let results = load_ensemble(&input)?;
            let outcome = DisagreementDetector::new(config.disagreement).detect_disagreement(&results)?;
            print_consensus_report(&results, &outcome);
        }

        Commands::Drift { input } => {
            let config = load_config(cli.config.as_deref())?;
            let history = load_history(&input)?;
            let report = DriftDetector::new(config.drift).detect_drift(&history)?;
            print_drift_report(&report);
        }

        Commands::Profiles => {
            let evaluator = load_evaluator(cli.config.as_deref())?;
            list_profiles(&evaluator);
        }

        Commands::InitConfig { output } => {
            init_config(output)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<EvalConfig, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => EvalConfig::from_file(path)?,
        None => EvalConfig::load_or_default()?,
    };
    config.validate()?;
    Ok(config)
}

fn load_evaluator(path: Option<&Path>) -> Result<Evaluator, Box<dyn std::error::Error>> {
    let config = match path {
        Some(path) => EvalConfig::from_file(path)?,
        None => EvalConfig::load_or_default()?,
    };
    Ok(Evaluator::new(config)?)
}

fn score(
    evaluator: &Evaluator,
    file: Option<PathBuf>,
    text: Option<String>,
    category: Option<String>,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = match (file, text) {
        (Some(path), _) => read_text(path)?,
        (None, Some(text)) => text,
        (None, None) => return Err("either --file or --text is required".into()),
    };

    let result = evaluator.evaluate(&text, category.as_deref());
    let json = if compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", json);
    Ok(())
}

async fn run_batch(
    evaluator: Evaluator,
    input: PathBuf,
    parallel: Option<usize>,
    timeout_ms: Option<u64>,
    output: Option<PathBuf>,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let started_at = Utc::now();
    let run_id = started_at.format("%Y%m%d-%H%M%S").to_string();

    let jobs = load_jobs(&input)?;
    let improvement_threshold = evaluator.config().thresholds.improvement_threshold;

    let mut config = ExecutorConfig::from(&evaluator.config().runner);
    if let Some(parallel) = parallel {
        config.parallel_evaluations = parallel.max(1);
    }
    if let Some(timeout_ms) = timeout_ms {
        config.timeout_ms = timeout_ms.max(1);
    }

    println!("=== Response Evaluation ===");
    println!("Run ID: {}", run_id);
    println!("Jobs:   {}", jobs.len());
    println!("Workers: {}", config.parallel_evaluations);

    let mut executor = Executor::new(Arc::new(evaluator), config);
    if progress {
        executor = executor.with_progress(Arc::new(ConsoleProgress));
    }

    let outcomes = executor.evaluate_batch(jobs).await;
    let summary = JsonSummary::from_outcomes(run_id, &outcomes, improvement_threshold);
    print_console_report(&summary);

    if let Some(path) = output {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        summary.write_to_file(&path)?;
        println!("Summary written to: {}", path.display());
    }

    Ok(())
}

fn run_ensemble(
    evaluator: &Evaluator,
    file: PathBuf,
    category: Option<String>,
    output: Option<PathBuf>,
    record: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let text = read_text(&file)?;
    let results = evaluator.evaluate_ensemble(
        &text,
        category.as_deref(),
        &evaluator.config().strategies,
    );

    let detector = DisagreementDetector::new(evaluator.config().disagreement.clone());
    let outcome = detector.detect_disagreement(&results)?;
    print_consensus_report(&results, &outcome);

    if let Some(path) = output {
        std::fs::write(&path, serde_json::to_string_pretty(&results)?)?;
        println!("Ensemble results written to: {}", path.display());
    }

    if let Some(path) = record {
        let ConsensusOutcome::Consensus(consensus) = &outcome else {
            return Err("not enough strategies to record a consensus score".into());
        };
        let existing = if path.exists() {
            load_history(&path)?
        } else {
            Vec::new()
        };
        let history = ScoreHistory::from_points(existing)?;
        history.record(consensus, Utc::now())?;
        std::fs::write(&path, serde_json::to_string_pretty(&history.snapshot())?)?;
        println!("History ({} points) written to: {}", history.len(), path.display());
    }

    Ok(())
}

fn list_profiles(evaluator: &Evaluator) {
    let resolver = evaluator.resolver();

    println!("Profiles ({}):", evaluator.config().profiles.len());
    println!("{:-<60}", "");
    for profile in resolver.profiles() {
        let marker = if profile.name == resolver.default_profile().name {
            " (default)"
        } else {
            ""
        };
        println!("  {} | {}{}", profile.name, profile.task_type, marker);
        if !profile.description.is_empty() {
            println!("      {}", profile.description);
        }
    }

    println!("\nCategories ({}):", resolver.categories().len());
    println!("{:-<60}", "");
    for (category, profile) in resolver.categories() {
        println!("  {:<24} -> {}", category, profile);
    }

    let strategies = &evaluator.config().strategies;
    if !strategies.is_empty() {
        println!("\nStrategies ({}):", strategies.len());
        println!("{:-<60}", "");
        for strategy in strategies {
            println!(
                "  {:<18} bias {:+.2}  profile {}",
                strategy.label,
                strategy.scoring_bias,
                strategy.profile.as_deref().unwrap_or("(category)")
            );
        }
    }
}

fn init_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = EvalConfig::default();
    config.save_toml(&output)?;
    println!("Configuration written to: {}", output.display());
    Ok(())
}
