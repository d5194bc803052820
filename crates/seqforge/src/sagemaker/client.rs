use async_trait::async_trait;

use super::{CreateTrainingJobRequest, ExperimentRun, RunOutcome, TrainingJobDescription};
use crate::error::RemoteResult;
use crate::training::TrainingJobName;

#[async_trait]
pub trait SageMakerClient: Send + Sync {
    /// CreatePresignedDomainUrl, returning the authorized URL
    async fn create_presigned_domain_url(
        &self,
        domain_id: &str,
        user_profile: &str,
    ) -> RemoteResult<String>;

    /// Load or create the experiment and its run group, then open the run
    async fn open_experiment_run(&self, run: &ExperimentRun) -> RemoteResult<()>;

    /// Mark the run's trial component finished with `outcome`
    async fn close_experiment_run(
        &self,
        run: &ExperimentRun,
        outcome: RunOutcome,
    ) -> RemoteResult<()>;

    /// CreateTrainingJob; returns once the job is accepted
    async fn create_training_job(&self, request: &CreateTrainingJobRequest) -> RemoteResult<()>;

    /// DescribeTrainingJob
    async fn describe_training_job(
        &self,
        job_name: &TrainingJobName,
    ) -> RemoteResult<TrainingJobDescription>;
}
