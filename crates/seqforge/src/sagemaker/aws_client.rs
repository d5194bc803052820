use async_trait::async_trait;
use chrono::Utc;
use aws_sdk_sagemaker::Client;
use aws_sdk_sagemaker::primitives::DateTime;
use aws_sdk_sagemaker::types::{
    AlgorithmSpecification, Channel, DataSource, ExperimentConfig,
    MetricDefinition as SdkMetricDefinition, OutputDataConfig, ResourceConfig, S3DataDistribution,
    S3DataSource, S3DataType, StoppingCondition, Tag, TensorBoardOutputConfig, TrainingInputMode,
    TrainingInstanceType, TrialComponentPrimaryStatus, TrialComponentStatus,
};
use tracing::debug;

use super::{
    CreateTrainingJobRequest, ExperimentRun, RunOutcome, SageMakerClient,
    TrainingJobDescription, TrainingJobStatus,
};
use crate::error::{RemoteError, RemoteResult};
use crate::training::{InputMode, TrainingJobName};

/// SageMaker client backed by the AWS SDK
#[derive(Debug, Clone)]
pub struct AwsSageMakerClient {
    client: Client,
}

impl AwsSageMakerClient {
    /// Create from a loaded AWS configuration
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    async fn ensure_experiment(&self, experiment_name: &str) -> RemoteResult<()> {
        match self
            .client
            .describe_experiment()
            .experiment_name(experiment_name)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_resource_not_found()) => {
                debug!(experiment = %experiment_name, "Creating experiment");
                self.client
                    .create_experiment()
                    .experiment_name(experiment_name)
                    .send()
                    .await
                    .map_err(|e| RemoteError::from_sdk("CreateExperiment", e))?;
                Ok(())
            }
            Err(e) => Err(RemoteError::from_sdk("DescribeExperiment", e)),
        }
    }

    async fn ensure_trial(&self, run: &ExperimentRun) -> RemoteResult<()> {
        match self
            .client
            .describe_trial()
            .trial_name(&run.trial_name)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(e) if e.as_service_error().is_some_and(|se| se.is_resource_not_found()) => {
                debug!(trial = %run.trial_name, "Creating run group");
                self.client
                    .create_trial()
                    .trial_name(&run.trial_name)
                    .experiment_name(&run.experiment_name)
                    .send()
                    .await
                    .map_err(|e| RemoteError::from_sdk("CreateTrial", e))?;
                Ok(())
            }
            Err(e) => Err(RemoteError::from_sdk("DescribeTrial", e)),
        }
    }
}

fn input_mode(mode: InputMode) -> TrainingInputMode {
    match mode {
        InputMode::File => TrainingInputMode::File,
        InputMode::Pipe => TrainingInputMode::Pipe,
        InputMode::FastFile => TrainingInputMode::from("FastFile"),
    }
}

fn primary_status(outcome: RunOutcome) -> TrialComponentPrimaryStatus {
    match outcome {
        RunOutcome::Completed => TrialComponentPrimaryStatus::Completed,
        RunOutcome::Stopped => TrialComponentPrimaryStatus::Stopped,
        RunOutcome::Failed => TrialComponentPrimaryStatus::Failed,
    }
}

#[async_trait]
impl SageMakerClient for AwsSageMakerClient {
    async fn create_presigned_domain_url(
        &self,
        domain_id: &str,
        user_profile: &str,
    ) -> RemoteResult<String> {
        debug!(domain_id = %domain_id, user_profile = %user_profile, "CreatePresignedDomainUrl");
        let output = self
            .client
            .create_presigned_domain_url()
            .domain_id(domain_id)
            .user_profile_name(user_profile)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("CreatePresignedDomainUrl", e))?;

        output
            .authorized_url()
            .map(str::to_string)
            .ok_or_else(|| {
                RemoteError::new("CreatePresignedDomainUrl", "response has no AuthorizedUrl")
            })
    }

    async fn open_experiment_run(&self, run: &ExperimentRun) -> RemoteResult<()> {
        self.ensure_experiment(&run.experiment_name).await?;
        self.ensure_trial(run).await?;

        let component = run.trial_component_name();
        debug!(trial_component = %component, "Opening experiment run");
        self.client
            .create_trial_component()
            .trial_component_name(&component)
            .display_name(&run.run_name)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("CreateTrialComponent", e))?;

        self.client
            .associate_trial_component()
            .trial_component_name(&component)
            .trial_name(&run.trial_name)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("AssociateTrialComponent", e))?;

        Ok(())
    }

    async fn close_experiment_run(
        &self,
        run: &ExperimentRun,
        outcome: RunOutcome,
    ) -> RemoteResult<()> {
        let component = run.trial_component_name();
        debug!(trial_component = %component, outcome = %outcome, "Closing experiment run");
        self.client
            .update_trial_component()
            .trial_component_name(&component)
            .status(
                TrialComponentStatus::builder()
                    .primary_status(primary_status(outcome))
                    .build(),
            )
            .end_time(DateTime::from_millis(Utc::now().timestamp_millis()))
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("UpdateTrialComponent", e))?;

        Ok(())
    }

    async fn create_training_job(&self, request: &CreateTrainingJobRequest) -> RemoteResult<()> {
        let metric_definitions = request
            .metric_definitions
            .iter()
            .map(|m| {
                SdkMetricDefinition::builder()
                    .name(&m.name)
                    .regex(&m.regex)
                    .build()
            })
            .collect::<Vec<_>>();

        let algorithm = AlgorithmSpecification::builder()
            .training_image(&request.image_uri)
            .training_input_mode(input_mode(request.input.mode))
            .set_metric_definitions(Some(metric_definitions))
            .build();

        let s3_source = S3DataSource::builder()
            .s3_data_type(S3DataType::S3Prefix)
            .s3_uri(&request.input.uri)
            .s3_data_distribution_type(S3DataDistribution::FullyReplicated)
            .build();

        let channel = Channel::builder()
            .channel_name(&request.input.name)
            .data_source(DataSource::builder().s3_data_source(s3_source).build())
            .input_mode(input_mode(request.input.mode))
            .build();

        let resources = ResourceConfig::builder()
            .instance_type(TrainingInstanceType::from(request.instance_type.as_str()))
            .instance_count(request.instance_count)
            .volume_size_in_gb(request.volume_size_gb)
            .keep_alive_period_in_seconds(request.keep_alive_seconds)
            .build();

        let output = OutputDataConfig::builder()
            .s3_output_path(&request.output_path)
            .build();

        let tensorboard = TensorBoardOutputConfig::builder()
            .local_path(&request.tensorboard.local_path)
            .s3_output_path(&request.tensorboard.s3_output_path)
            .build();

        let tags = request
            .tags
            .iter()
            .map(|(key, value)| Tag::builder().key(key).value(value).build())
            .collect::<Vec<_>>();

        let experiment = request.experiment.as_ref().map(|run| {
            ExperimentConfig::builder()
                .experiment_name(&run.experiment_name)
                .trial_name(&run.trial_name)
                .run_name(&run.run_name)
                .build()
        });

        debug!(job_name = %request.job_name, "CreateTrainingJob");
        self.client
            .create_training_job()
            .training_job_name(request.job_name.as_str())
            .role_arn(&request.role_arn)
            .algorithm_specification(algorithm)
            .set_hyper_parameters(Some(
                request.hyperparameters.clone().into_iter().collect(),
            ))
            .input_data_config(channel)
            .output_data_config(output)
            .resource_config(resources)
            .stopping_condition(
                StoppingCondition::builder()
                    .max_runtime_in_seconds(request.max_runtime_seconds)
                    .build(),
            )
            .tensor_board_output_config(tensorboard)
            .set_tags(Some(tags))
            .set_experiment_config(experiment)
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("CreateTrainingJob", e))?;

        Ok(())
    }

    async fn describe_training_job(
        &self,
        job_name: &TrainingJobName,
    ) -> RemoteResult<TrainingJobDescription> {
        let output = self
            .client
            .describe_training_job()
            .training_job_name(job_name.as_str())
            .send()
            .await
            .map_err(|e| RemoteError::from_sdk("DescribeTrainingJob", e))?;

        let status = output
            .training_job_status()
            .and_then(|s| s.as_str().parse::<TrainingJobStatus>().ok())
            .ok_or_else(|| {
                RemoteError::new(
                    "DescribeTrainingJob",
                    format!(
                        "unrecognized status for {}: {:?}",
                        job_name,
                        output.training_job_status()
                    ),
                )
            })?;

        Ok(TrainingJobDescription {
            name: job_name.clone(),
            status,
            secondary_status: output.secondary_status().map(|s| s.as_str().to_string()),
            failure_reason: output.failure_reason().map(str::to_string),
        })
    }
}
