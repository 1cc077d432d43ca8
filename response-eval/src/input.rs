//! Loading responses, jobs, ensembles and histories from disk

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;

use crate::drift::ScoreHistoryPoint;
use crate::ensemble::EnsembleEvaluationResult;
use crate::runner::EvaluationJob;

/// Error type for input loading
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Empty input: {0}")]
    Empty(String),
}

/// Read and deserialize a JSON file
pub fn read_json<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T, InputError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| InputError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Read a response text file. Blank files are rejected.
pub fn read_text(path: impl AsRef<Path>) -> Result<String, InputError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Err(InputError::Empty(path.display().to_string()));
    }
    Ok(content)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JobsFile {
    List(Vec<EvaluationJob>),
    Wrapped { jobs: Vec<EvaluationJob> },
}

/// Load jobs from either a bare array or a `{"jobs": [...]}` object
pub fn load_jobs(path: impl AsRef<Path>) -> Result<Vec<EvaluationJob>, InputError> {
    let path = path.as_ref();
    let jobs = match read_json::<JobsFile>(path)? {
        JobsFile::List(jobs) | JobsFile::Wrapped { jobs } => jobs,
    };
    if jobs.is_empty() {
        return Err(InputError::Empty(path.display().to_string()));
    }
    Ok(jobs)
}

pub fn load_ensemble(path: impl AsRef<Path>) -> Result<Vec<EnsembleEvaluationResult>, InputError> {
    read_json(path)
}

pub fn load_history(path: impl AsRef<Path>) -> Result<Vec<ScoreHistoryPoint>, InputError> {
    read_json(path)
}
