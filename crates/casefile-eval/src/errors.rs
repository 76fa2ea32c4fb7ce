use thiserror::Error;

/// Errors emitted by the verification engine.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("invalid dataset: {0}")]
    InvalidDataset(String),
    #[error("verification failed with {0} violation(s)")]
    Violations(u64),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<casefile_core::Error> for EvalError {
    fn from(err: casefile_core::Error) -> Self {
        EvalError::InvalidDataset(err.to_string())
    }
}
