//! Configure and run SageMaker training jobs

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    HyperparameterValue, Hyperparameters, InputChannel, MetricDefinition, TensorBoardOutput,
    TrainingError, TrainingJobConfig, TrainingJobName, TrainingResult, unique_name,
};
use crate::config::TrainingDefaults;
use crate::sagemaker::{
    CreateTrainingJobRequest, ExperimentRun, RunOutcome, SageMakerClient, TrainingJobStatus,
};
use crate::session::SessionContext;

/// Container path the training script writes TensorBoard events to
pub const TENSORBOARD_LOCAL_PATH: &str = "/opt/ml/output/tensorboard";

/// Launches training jobs for one session.
///
/// `configure` must be called before `launch`; launching blocks until the
/// remote job reaches a terminal status.
pub struct TrainingJobLauncher {
    sagemaker: Arc<dyn SageMakerClient>,
    region: String,
    bucket: String,
    role: String,
    defaults: TrainingDefaults,
    config: Option<TrainingJobConfig>,
}

impl TrainingJobLauncher {
    /// Create a launcher from a resolved session
    pub fn new(session: &SessionContext, defaults: TrainingDefaults) -> Self {
        Self {
            sagemaker: session.sagemaker(),
            region: session.region().to_string(),
            bucket: session.bucket().to_string(),
            role: session.role().to_string(),
            defaults,
            config: None,
        }
    }

    /// Build the job configuration, replacing any previous one
    pub fn configure(
        &mut self,
        experiment_name: impl Into<String>,
        base_job_name: impl Into<String>,
        hyperparameters: Hyperparameters,
        metric_definitions: Vec<MetricDefinition>,
    ) -> &TrainingJobConfig {
        let base_job_name = base_job_name.into();
        let output_path = format!(
            "s3://{}/sagemaker-output/training/{}",
            self.bucket, base_job_name
        );

        let mut tags = BTreeMap::new();
        tags.insert("project".to_string(), self.defaults.project_tag.clone());

        let config = TrainingJobConfig {
            experiment_name: experiment_name.into(),
            base_job_name,
            region: self.region.clone(),
            role: self.role.clone(),
            image_uri: self.defaults.image_uri(&self.region),
            instance_type: self.defaults.instance_type.clone(),
            instance_count: self.defaults.instance_count,
            volume_size_gb: self.defaults.volume_size_gb,
            max_runtime_seconds: self.defaults.max_runtime_seconds,
            keep_alive_seconds: self.defaults.keep_alive_seconds,
            distributed: self.defaults.distributed,
            entry_point: self.defaults.entry_point.clone(),
            source_uri: self.defaults.source_uri.clone(),
            hyperparameters,
            metric_definitions,
            tensorboard: TensorBoardOutput {
                s3_output_path: format!("{}/tensorboard", output_path),
                local_path: TENSORBOARD_LOCAL_PATH.to_string(),
            },
            output_path,
            tags,
        };

        debug!(base_job_name = %config.base_job_name, image = %config.image_uri, "Configured training job");
        self.config.insert(config)
    }

    /// Current configuration, if any
    pub fn config(&self) -> Option<&TrainingJobConfig> {
        self.config.as_ref()
    }

    /// Submit the configured job on `data_uri` and wait for it to finish.
    ///
    /// Returns the job name once the job is `Completed` or `Stopped`. A
    /// `Failed` job is an error; nothing is retried. The experiment run is
    /// closed with the job's outcome on every path after it was opened.
    pub async fn launch(&self, data_uri: &str) -> TrainingResult<TrainingJobName> {
        let config = self.config.as_ref().ok_or(TrainingError::NotConfigured)?;
        if config.source_uri.is_none() {
            return Err(TrainingError::MissingSource);
        }

        let now = Utc::now();
        let job_name = TrainingJobName::from_string(unique_name(&config.base_job_name, now));
        let run = ExperimentRun::new(&config.experiment_name, unique_name("sagemaker-run", now));

        self.sagemaker.open_experiment_run(&run).await?;

        let result = self.run_job(config, &job_name, &run, data_uri).await;
        let outcome = match &result {
            Ok(status) => RunOutcome::from(*status),
            Err(_) => RunOutcome::Failed,
        };
        let closed = self.sagemaker.close_experiment_run(&run, outcome).await;

        match (result, closed) {
            (Ok(status), Ok(())) => {
                info!(job_name = %job_name, status = %status, "Training job finished");
                Ok(job_name)
            }
            (Ok(_), Err(err)) => Err(err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                warn!(run = %run.run_name, error = %close_err, "Could not close experiment run");
                Err(err)
            }
        }
    }

    async fn run_job(
        &self,
        config: &TrainingJobConfig,
        job_name: &TrainingJobName,
        run: &ExperimentRun,
        data_uri: &str,
    ) -> TrainingResult<TrainingJobStatus> {
        let request = Self::build_request(config, job_name.clone(), run.clone(), data_uri);
        info!(job_name = %job_name, data_uri = %data_uri, "Submitting training job");
        self.sagemaker.create_training_job(&request).await?;

        self.wait_for_completion(job_name).await
    }

    async fn wait_for_completion(
        &self,
        job_name: &TrainingJobName,
    ) -> TrainingResult<TrainingJobStatus> {
        let interval = Duration::from_secs(self.defaults.poll_interval_secs);

        loop {
            let description = self.sagemaker.describe_training_job(job_name).await?;
            debug!(
                job_name = %job_name,
                status = %description.status,
                secondary_status = ?description.secondary_status,
                "Polled training job"
            );

            match description.status {
                TrainingJobStatus::Completed => return Ok(TrainingJobStatus::Completed),
                TrainingJobStatus::Stopped => {
                    warn!(
                        job_name = %job_name,
                        reason = ?description.failure_reason,
                        "Training job was stopped before completing"
                    );
                    return Ok(TrainingJobStatus::Stopped);
                }
                TrainingJobStatus::Failed => {
                    warn!(
                        job_name = %job_name,
                        reason = ?description.failure_reason,
                        "Training job failed"
                    );
                    return Err(TrainingError::JobFailed {
                        name: job_name.clone(),
                        status: description.status,
                        reason: description.failure_reason,
                    });
                }
                TrainingJobStatus::InProgress | TrainingJobStatus::Stopping => {
                    tokio::time::sleep(interval).await;
                }
            }
        }
    }

    fn build_request(
        config: &TrainingJobConfig,
        job_name: TrainingJobName,
        run: ExperimentRun,
        data_uri: &str,
    ) -> CreateTrainingJobRequest {
        let mut hyperparameters = config.encoded_hyperparameters();
        hyperparameters.insert(
            "sagemaker_job_name".to_string(),
            HyperparameterValue::from(job_name.as_str()).encode(),
        );

        CreateTrainingJobRequest {
            job_name,
            image_uri: config.image_uri.clone(),
            role_arn: config.role.clone(),
            instance_type: config.instance_type.clone(),
            instance_count: config.instance_count,
            volume_size_gb: config.volume_size_gb,
            max_runtime_seconds: config.max_runtime_seconds,
            keep_alive_seconds: config.keep_alive_seconds,
            hyperparameters,
            metric_definitions: config.metric_definitions.clone(),
            input: InputChannel::data(data_uri),
            output_path: config.output_path.clone(),
            tensorboard: config.tensorboard.clone(),
            tags: config.tags.clone(),
            experiment: Some(run),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeqforgeConfig;
    use crate::sagemaker::InMemorySageMakerClient;
    use crate::session::StaticIdentity;
    use crate::training::InputMode;

    const ROLE: &str = "arn:aws:iam::123456789012:role/SageMakerExecution";
    const SOURCE: &str = "s3://sagemaker-us-east-1-123456789012/code/sourcedir.tar.gz";

    async fn launcher_with(client: InMemorySageMakerClient) -> TrainingJobLauncher {
        let identity = StaticIdentity::new(Some("us-east-1"), "123456789012", ROLE);
        let session = SessionContext::resolve(&identity, Arc::new(client), &SeqforgeConfig::default())
            .await
            .unwrap();

        let defaults = TrainingDefaults {
            poll_interval_secs: 0,
            source_uri: Some(SOURCE.to_string()),
            ..TrainingDefaults::default()
        };
        TrainingJobLauncher::new(&session, defaults)
    }

    fn hyperparameters() -> Hyperparameters {
        let mut params = Hyperparameters::new();
        params.insert("epochs".to_string(), 3i64.into());
        params.insert("model_id".to_string(), "hyenadna-small-32k".into());
        params
    }

    #[tokio::test]
    async fn test_configure() {
        let mut launcher = launcher_with(InMemorySageMakerClient::new()).await;

        let config = launcher.configure(
            "genomics-pretraining",
            "hyenadna",
            hyperparameters(),
            vec![MetricDefinition::new("train_loss", "loss: ([0-9.]+)")],
        );

        assert_eq!(config.instance_type, "ml.g5.12xlarge");
        assert_eq!(config.instance_count, 1);
        assert_eq!(
            config.image_uri,
            "763104351884.dkr.ecr.us-east-1.amazonaws.com/pytorch-training:2.2.0-gpu-py310-cu121-ubuntu20.04-sagemaker"
        );
        assert!(config.distributed);
        assert_eq!(config.keep_alive_seconds, 1800);
        assert_eq!(config.role, ROLE);
        assert_eq!(
            config.output_path,
            "s3://sagemaker-us-east-1-123456789012/sagemaker-output/training/hyenadna"
        );
        assert_eq!(
            config.tensorboard.s3_output_path,
            "s3://sagemaker-us-east-1-123456789012/sagemaker-output/training/hyenadna/tensorboard"
        );
        assert_eq!(config.tensorboard.local_path, TENSORBOARD_LOCAL_PATH);
        assert_eq!(config.tags["project"], "genomics-model-pretraining");
    }

    #[tokio::test]
    async fn test_encoded_hyperparameters() {
        let mut launcher = launcher_with(InMemorySageMakerClient::new()).await;
        let config = launcher.configure("exp", "job", hyperparameters(), vec![]);

        let encoded = config.encoded_hyperparameters();
        assert_eq!(encoded["epochs"], "3");
        assert_eq!(encoded["model_id"], "\"hyenadna-small-32k\"");
        assert_eq!(encoded["sagemaker_program"], "\"train_hf_accelerate.py\"");
        assert_eq!(encoded["sagemaker_region"], "\"us-east-1\"");
        assert_eq!(encoded["sagemaker_torch_distributed_enabled"], "true");
        assert_eq!(encoded["sagemaker_submit_directory"], format!("\"{}\"", SOURCE));
    }

    #[tokio::test]
    async fn test_launch_before_configure() {
        let launcher = launcher_with(InMemorySageMakerClient::new()).await;

        let result = launcher.launch("s3://bucket/store1/readSet/").await;
        assert!(matches!(result, Err(TrainingError::NotConfigured)));
    }

    #[tokio::test]
    async fn test_launch_without_source() {
        let client = InMemorySageMakerClient::new();
        let identity = StaticIdentity::new(Some("us-east-1"), "123456789012", ROLE);
        let session =
            SessionContext::resolve(&identity, Arc::new(client.clone()), &SeqforgeConfig::default())
                .await
                .unwrap();
        let mut launcher = TrainingJobLauncher::new(&session, TrainingDefaults::default());
        launcher.configure("exp", "job", hyperparameters(), vec![]);

        let result = launcher.launch("s3://bucket/data/").await;

        assert!(matches!(result, Err(TrainingError::MissingSource)));
        assert!(client.runs().await.is_empty());
        assert!(client.jobs().await.is_empty());
    }

    #[tokio::test]
    async fn test_launch_waits_for_completion() {
        let client = InMemorySageMakerClient::new().with_polls_before_done(2);
        let mut launcher = launcher_with(client.clone()).await;
        launcher.configure("genomics-pretraining", "hyenadna", hyperparameters(), vec![]);

        let job_name = launcher.launch("s3://bucket/store1/readSet/").await.unwrap();

        assert!(job_name.as_str().starts_with("hyenadna-"));
        assert_eq!(client.describe_calls().await, 3);

        let jobs = client.jobs().await;
        assert_eq!(jobs.len(), 1);
        let job = &jobs[0];
        assert_eq!(job.job_name, job_name);
        assert_eq!(job.input.name, "data");
        assert_eq!(job.input.uri, "s3://bucket/store1/readSet/");
        assert_eq!(job.input.mode, InputMode::File);

        assert_eq!(job.hyperparameters["sagemaker_job_name"], format!("\"{}\"", job_name));
        assert_eq!(
            job.hyperparameters["sagemaker_submit_directory"],
            format!("\"{}\"", SOURCE)
        );

        let runs = client.runs().await;
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].experiment_name, "genomics-pretraining");
        assert_eq!(job.experiment.as_ref(), Some(&runs[0]));
        assert_eq!(
            client.closed_runs().await,
            vec![(runs[0].clone(), RunOutcome::Completed)]
        );
    }

    #[tokio::test]
    async fn test_stopped_job_returns_name() {
        let client = InMemorySageMakerClient::new()
            .with_polls_before_done(1)
            .with_outcome(
                TrainingJobStatus::Stopped,
                Some("MaxRuntimeExceeded".to_string()),
            );
        let mut launcher = launcher_with(client.clone()).await;
        launcher.configure("exp", "job", hyperparameters(), vec![]);

        let job_name = launcher.launch("s3://bucket/data/").await.unwrap();

        assert_eq!(client.jobs().await[0].job_name, job_name);
        let closed = client.closed_runs().await;
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].1, RunOutcome::Stopped);
    }

    #[tokio::test]
    async fn test_hyperparameter_content_is_opaque() {
        let client = InMemorySageMakerClient::new();
        let mut launcher = launcher_with(client.clone()).await;

        let mut odd = Hyperparameters::new();
        odd.insert("".to_string(), HyperparameterValue::Float(-1.5));
        odd.insert("nested".to_string(), "{\"a\": [1, 2]}".into());
        launcher.configure("exp", "job", odd, vec![]);

        let job_name = launcher.launch("s3://bucket/data/").await.unwrap();
        assert!(job_name.as_str().starts_with("job-"));
    }

    #[tokio::test]
    async fn test_rejected_hyperparameters_are_remote_errors() {
        let client = InMemorySageMakerClient::new().with_rejected_hyperparameter("epochs");
        let mut launcher = launcher_with(client.clone()).await;
        launcher.configure("exp", "job", hyperparameters(), vec![]);

        let result = launcher.launch("s3://bucket/data/").await;
        match result {
            Err(TrainingError::Remote(err)) => {
                assert_eq!(err.operation, "CreateTrainingJob");
                assert_eq!(err.code.as_deref(), Some("ValidationException"));
            }
            other => panic!("expected remote error, got {:?}", other),
        }
        assert!(client.jobs().await.is_empty());
        let closed = client.closed_runs().await;
        assert_eq!(closed.len(), 1);
        assert_eq!(closed[0].1, RunOutcome::Failed);
    }

    #[tokio::test]
    async fn test_failed_job() {
        let client = InMemorySageMakerClient::new()
            .with_polls_before_done(1)
            .with_outcome(
                TrainingJobStatus::Failed,
                Some("CapacityError: Unable to provision requested ML compute capacity".to_string()),
            );
        let mut launcher = launcher_with(client.clone()).await;
        launcher.configure("exp", "job", hyperparameters(), vec![]);

        let result = launcher.launch("s3://bucket/data/").await;
        match result {
            Err(TrainingError::JobFailed { status, reason, .. }) => {
                assert_eq!(status, TrainingJobStatus::Failed);
                assert!(reason.unwrap().starts_with("CapacityError"));
            }
            other => panic!("expected job failure, got {:?}", other),
        }

        let runs = client.runs().await;
        assert_eq!(client.closed_runs().await, vec![(runs[0].clone(), RunOutcome::Failed)]);
    }

    #[tokio::test]
    async fn test_configure_replaces_previous() {
        let mut launcher = launcher_with(InMemorySageMakerClient::new()).await;
        launcher.configure("exp", "first", Hyperparameters::new(), vec![]);
        launcher.configure("exp", "second", Hyperparameters::new(), vec![]);

        assert_eq!(launcher.config().unwrap().base_job_name, "second");
    }
}
