use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::{Display, EnumString};

use crate::training::{InputChannel, MetricDefinition, TensorBoardOutput, TrainingJobName};

/// Training job status as reported by DescribeTrainingJob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum TrainingJobStatus {
    InProgress,
    Completed,
    Failed,
    Stopping,
    Stopped,
}

impl TrainingJobStatus {
    /// Whether the job will not change status again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TrainingJobStatus::Completed | TrainingJobStatus::Failed | TrainingJobStatus::Stopped
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingJobDescription {
    pub name: TrainingJobName,
    pub status: TrainingJobStatus,
    pub secondary_status: Option<String>,
    pub failure_reason: Option<String>,
}

/// Experiment-tracking scope a training job is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperimentRun {
    pub experiment_name: String,
    /// Run group; one per experiment
    pub trial_name: String,
    pub run_name: String,
}

impl ExperimentRun {
    pub fn new(experiment_name: impl Into<String>, run_name: impl Into<String>) -> Self {
        let experiment_name = experiment_name.into();
        Self {
            trial_name: format!("Default-Run-Group-{}", experiment_name),
            experiment_name,
            run_name: run_name.into(),
        }
    }

    /// Name of the trial component backing the run
    pub fn trial_component_name(&self) -> String {
        format!("{}-{}", self.experiment_name, self.run_name)
    }
}

/// Final state recorded on an experiment run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum RunOutcome {
    Completed,
    Stopped,
    Failed,
}

impl From<TrainingJobStatus> for RunOutcome {
    fn from(status: TrainingJobStatus) -> Self {
        match status {
            TrainingJobStatus::Completed => RunOutcome::Completed,
            TrainingJobStatus::Stopped => RunOutcome::Stopped,
            _ => RunOutcome::Failed,
        }
    }
}

/// Everything CreateTrainingJob needs, already resolved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTrainingJobRequest {
    pub job_name: TrainingJobName,
    pub image_uri: String,
    pub role_arn: String,
    pub instance_type: String,
    pub instance_count: i32,
    pub volume_size_gb: i32,
    pub max_runtime_seconds: i32,
    pub keep_alive_seconds: i32,
    /// JSON-encoded values, as framework containers expect
    pub hyperparameters: BTreeMap<String, String>,
    pub metric_definitions: Vec<MetricDefinition>,
    pub input: InputChannel,
    pub output_path: String,
    pub tensorboard: TensorBoardOutput,
    pub tags: BTreeMap<String, String>,
    pub experiment: Option<ExperimentRun>,
}
