//! SageMaker API surface used by the session and training modules

pub mod aws_client;
pub mod client;
pub mod in_memory_client;
pub mod model;

pub use aws_client::AwsSageMakerClient;
pub use client::SageMakerClient;
pub use in_memory_client::InMemorySageMakerClient;
pub use model::{
    CreateTrainingJobRequest, ExperimentRun, RunOutcome, TrainingJobDescription, TrainingJobStatus,
};
