use std::path::PathBuf;
use thiserror::Error;

use crate::error::RemoteError;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No AWS region configured")]
    MissingRegion,

    #[error("The current AWS identity is not a role: {0}")]
    NotARole(String),

    #[error("Failed to read {}: {source}", .path.display())]
    MetadataIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    MetadataParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type SessionResult<T> = Result<T, SessionError>;
