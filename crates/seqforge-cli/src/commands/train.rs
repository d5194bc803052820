//! train command

use serde::Serialize;
use serde::de::DeserializeOwned;
use seqforge::training::{Hyperparameters, MetricDefinition};
use seqforge::{SeqforgeConfig, SessionContext, TrainingDefaults, TrainingJobLauncher};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::CliError;

/// Arguments of the train command
#[derive(Debug, Clone, Default)]
pub struct TrainArgs {
    pub experiment_name: String,
    pub base_job_name: String,
    pub data_uri: String,
    /// JSON object of hyperparameters
    pub hyperparameters: Option<PathBuf>,
    /// JSON array of `{"Name", "Regex"}` metric definitions
    pub metrics: Option<PathBuf>,
    pub instance_type: Option<String>,
    pub instance_count: Option<i32>,
    /// Staged `sourcedir.tar.gz` holding the entry point
    pub source_uri: Option<String>,
}

/// Result printed once the job has completed
#[derive(Debug, Clone, Serialize)]
pub struct TrainOutput {
    pub job_name: String,
    pub experiment_name: String,
    pub output_path: String,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a hyperparameter file
pub fn load_hyperparameters(path: &Path) -> Result<Hyperparameters, CliError> {
    load_json(path)
}

/// Read a metric definition file
pub fn load_metric_definitions(path: &Path) -> Result<Vec<MetricDefinition>, CliError> {
    load_json(path)
}

/// Configure and run a training job against AWS, waiting for it to finish
pub async fn run_train(config: &SeqforgeConfig, args: TrainArgs) -> Result<TrainOutput, CliError> {
    let session = SessionContext::initialize(config).await?;
    train_with(&session, config.training.clone(), args).await
}

pub async fn train_with(
    session: &SessionContext,
    mut defaults: TrainingDefaults,
    args: TrainArgs,
) -> Result<TrainOutput, CliError> {
    if args.experiment_name.is_empty() || args.base_job_name.is_empty() {
        return Err(CliError::InvalidInput(
            "experiment name and base job name must not be empty".to_string(),
        ));
    }

    let hyperparameters = match &args.hyperparameters {
        Some(path) => load_hyperparameters(path)?,
        None => Hyperparameters::new(),
    };
    let metric_definitions = match &args.metrics {
        Some(path) => load_metric_definitions(path)?,
        None => Vec::new(),
    };

    if let Some(instance_type) = args.instance_type {
        defaults.instance_type = instance_type;
    }
    if let Some(instance_count) = args.instance_count {
        defaults.instance_count = instance_count;
    }
    if let Some(source_uri) = args.source_uri {
        defaults.source_uri = Some(source_uri);
    }

    let mut launcher = TrainingJobLauncher::new(session, defaults);
    let output_path = launcher
        .configure(
            args.experiment_name.clone(),
            args.base_job_name,
            hyperparameters,
            metric_definitions,
        )
        .output_path
        .clone();

    info!(experiment = %args.experiment_name, "Launching training job");
    let job_name = launcher.launch(&args.data_uri).await?;

    Ok(TrainOutput {
        job_name: job_name.to_string(),
        experiment_name: args.experiment_name,
        output_path,
    })
}
