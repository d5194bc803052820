use thiserror::Error;

use super::TrainingJobName;
use crate::error::RemoteError;
use crate::sagemaker::TrainingJobStatus;

#[derive(Error, Debug)]
pub enum TrainingError {
    #[error("No training job configured; call configure() before launch()")]
    NotConfigured,

    #[error("No training source configured; set training.source_uri to a staged sourcedir.tar.gz")]
    MissingSource,

    #[error(
        "Training job {name} ended as {status}: {}",
        .reason.as_deref().unwrap_or("no failure reason reported")
    )]
    JobFailed {
        name: TrainingJobName,
        status: TrainingJobStatus,
        reason: Option<String>,
    },

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type TrainingResult<T> = Result<T, TrainingError>;
