//! Error types for seqforge-cli

use seqforge::SeqforgeError;
use seqforge::session::SessionError;
use seqforge::store_access::StoreAccessError;
use seqforge::training::TrainingError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Seqforge(#[from] SeqforgeError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    ParseFile {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<StoreAccessError> for CliError {
    fn from(err: StoreAccessError) -> Self {
        CliError::Seqforge(err.into())
    }
}

impl From<SessionError> for CliError {
    fn from(err: SessionError) -> Self {
        CliError::Seqforge(err.into())
    }
}

impl From<TrainingError> for CliError {
    fn from(err: TrainingError) -> Self {
        CliError::Seqforge(err.into())
    }
}
