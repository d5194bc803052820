//! Error types for seqforge crate

use aws_sdk_sagemaker::error::{DisplayErrorContext, ProvideErrorMetadata};
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure reported by a remote service (HealthOmics, SageMaker, STS).
///
/// The original SDK error is kept as the `source()` so callers can downcast
/// it; nothing is retried or reinterpreted here.
#[derive(Error, Debug)]
#[error("{operation} failed: {message}")]
pub struct RemoteError {
    pub operation: &'static str,
    pub code: Option<String>,
    pub message: String,
    #[source]
    source: Option<BoxError>,
}

impl RemoteError {
    /// Error raised by something that is not an SDK call (in-memory clients, malformed responses).
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Set the service error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Wrap an AWS SDK error, keeping its error code and the full error chain.
    pub fn from_sdk<E>(operation: &'static str, err: E) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    {
        Self {
            operation,
            code: err.code().map(str::to_string),
            message: DisplayErrorContext(&err).to_string(),
            source: Some(Box::new(err)),
        }
    }
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;

#[derive(Error, Debug)]
pub enum SeqforgeError {
    #[error("Store access error: {0}")]
    StoreAccess(#[from] crate::store_access::StoreAccessError),

    #[error("Session error: {0}")]
    Session(#[from] crate::session::SessionError),

    #[error("Training error: {0}")]
    Training(#[from] crate::training::TrainingError),
}

pub type Result<T> = std::result::Result<T, SeqforgeError>;
