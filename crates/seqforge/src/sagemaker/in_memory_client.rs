use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{
    CreateTrainingJobRequest, ExperimentRun, RunOutcome, SageMakerClient,
    TrainingJobDescription, TrainingJobStatus,
};
use crate::error::{RemoteError, RemoteResult};
use crate::training::TrainingJobName;

#[derive(Default)]
struct State {
    presigned_urls: Vec<(String, String)>,
    runs: Vec<ExperimentRun>,
    closed_runs: Vec<(ExperimentRun, RunOutcome)>,
    jobs: Vec<CreateTrainingJobRequest>,
    /// Remaining InProgress answers per job
    pending_polls: HashMap<TrainingJobName, u32>,
    describe_calls: u32,
}

/// In-memory implementation of SageMakerClient
///
/// Jobs report `InProgress` for a configurable number of polls, then the
/// configured outcome.
#[derive(Clone)]
pub struct InMemorySageMakerClient {
    state: Arc<RwLock<State>>,
    polls_before_done: u32,
    outcome: TrainingJobStatus,
    failure_reason: Option<String>,
    rejected_hyperparameter: Option<String>,
}

impl InMemorySageMakerClient {
    /// Jobs complete on the first poll
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::default())),
            polls_before_done: 0,
            outcome: TrainingJobStatus::Completed,
            failure_reason: None,
            rejected_hyperparameter: None,
        }
    }

    /// Number of `InProgress` answers before the outcome is reported
    pub fn with_polls_before_done(mut self, polls: u32) -> Self {
        self.polls_before_done = polls;
        self
    }

    /// Terminal status every job ends in
    pub fn with_outcome(mut self, status: TrainingJobStatus, reason: Option<String>) -> Self {
        self.outcome = status;
        self.failure_reason = reason;
        self
    }

    /// Reject CreateTrainingJob when this hyperparameter is present
    pub fn with_rejected_hyperparameter(mut self, key: impl Into<String>) -> Self {
        self.rejected_hyperparameter = Some(key.into());
        self
    }

    /// Submitted training jobs, oldest first
    pub async fn jobs(&self) -> Vec<CreateTrainingJobRequest> {
        self.state.read().await.jobs.clone()
    }

    /// Opened experiment runs, oldest first
    pub async fn runs(&self) -> Vec<ExperimentRun> {
        self.state.read().await.runs.clone()
    }

    /// Closed experiment runs with their outcome, oldest first
    pub async fn closed_runs(&self) -> Vec<(ExperimentRun, RunOutcome)> {
        self.state.read().await.closed_runs.clone()
    }

    /// (domain id, user profile) pairs presigned so far
    pub async fn presigned_urls(&self) -> Vec<(String, String)> {
        self.state.read().await.presigned_urls.clone()
    }

    /// Number of DescribeTrainingJob calls
    pub async fn describe_calls(&self) -> u32 {
        self.state.read().await.describe_calls
    }
}

impl Default for InMemorySageMakerClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SageMakerClient for InMemorySageMakerClient {
    async fn create_presigned_domain_url(
        &self,
        domain_id: &str,
        user_profile: &str,
    ) -> RemoteResult<String> {
        let mut state = self.state.write().await;
        state
            .presigned_urls
            .push((domain_id.to_string(), user_profile.to_string()));

        Ok(format!(
            "https://{}.studio.sagemaker.aws/auth?token={}",
            domain_id, user_profile
        ))
    }

    async fn open_experiment_run(&self, run: &ExperimentRun) -> RemoteResult<()> {
        let mut state = self.state.write().await;
        state.runs.push(run.clone());
        Ok(())
    }

    async fn close_experiment_run(
        &self,
        run: &ExperimentRun,
        outcome: RunOutcome,
    ) -> RemoteResult<()> {
        let mut state = self.state.write().await;
        if !state.runs.contains(run) {
            return Err(RemoteError::new(
                "UpdateTrialComponent",
                format!("trial component {} not found", run.trial_component_name()),
            )
            .with_code("ResourceNotFound"));
        }
        state.closed_runs.push((run.clone(), outcome));
        Ok(())
    }

    async fn create_training_job(&self, request: &CreateTrainingJobRequest) -> RemoteResult<()> {
        if let Some(key) = &self.rejected_hyperparameter {
            if request.hyperparameters.contains_key(key) {
                return Err(RemoteError::new(
                    "CreateTrainingJob",
                    format!("invalid hyperparameter: {}", key),
                )
                .with_code("ValidationException"));
            }
        }

        let mut state = self.state.write().await;
        if state.jobs.iter().any(|job| job.job_name == request.job_name) {
            return Err(RemoteError::new(
                "CreateTrainingJob",
                format!("training job {} already exists", request.job_name),
            )
            .with_code("ResourceInUse"));
        }

        state
            .pending_polls
            .insert(request.job_name.clone(), self.polls_before_done);
        state.jobs.push(request.clone());
        Ok(())
    }

    async fn describe_training_job(
        &self,
        job_name: &TrainingJobName,
    ) -> RemoteResult<TrainingJobDescription> {
        let mut state = self.state.write().await;
        state.describe_calls += 1;

        let remaining = state.pending_polls.get_mut(job_name).ok_or_else(|| {
            RemoteError::new(
                "DescribeTrainingJob",
                format!("training job {} not found", job_name),
            )
            .with_code("ValidationException")
        })?;

        let (status, failure_reason) = if *remaining > 0 {
            *remaining -= 1;
            (TrainingJobStatus::InProgress, None)
        } else {
            (self.outcome, self.failure_reason.clone())
        };

        Ok(TrainingJobDescription {
            name: job_name.clone(),
            status,
            secondary_status: None,
            failure_reason,
        })
    }
}
