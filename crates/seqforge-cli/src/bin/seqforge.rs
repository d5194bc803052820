//! CLI for HealthOmics store access and SageMaker training jobs

use anyhow::Context;
use clap::Parser;
use seqforge::SeqforgeConfig;
use seqforge_cli::commands::{self, PolicyTarget, TrainArgs, print_json};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// HealthOmics store access and SageMaker training launcher
#[derive(Parser)]
#[command(name = "seqforge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file path (JSON)
    #[arg(short, long, env = "SEQFORGE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// AWS region (overrides the config file and the ambient chain)
    #[arg(short, long, global = true)]
    region: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "SEQFORGE_LOG_LEVEL", global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Resolve S3 access details for a HealthOmics store
    StoreAccess {
        /// Store id
        #[arg(long, short = 's')]
        store_id: String,

        /// Store type (sequence or reference)
        #[arg(long, short = 't', default_value = "sequence")]
        store_type: String,
    },
    /// Print the IAM policy granting read access to a store
    IamPolicy {
        /// S3 access point ARN (requires --key-arn)
        #[arg(long)]
        s3_arn: Option<String>,

        /// KMS key ARN (requires --s3-arn)
        #[arg(long)]
        key_arn: Option<String>,

        /// Store id to look the ARNs up for
        #[arg(long, short = 's')]
        store_id: Option<String>,

        /// Store type (sequence or reference)
        #[arg(long, short = 't', default_value = "sequence")]
        store_type: String,
    },
    /// Show the resolved region, default bucket and execution role
    Session,
    /// Presign a TensorBoard URL for a training job
    Dashboard {
        /// Training job name
        #[arg(long, short = 'j')]
        job_name: String,

        /// Studio user profile
        #[arg(long, short = 'u')]
        user_profile: String,
    },
    /// Launch a training job and wait for it to finish
    Train {
        /// Experiment to attach the run to
        #[arg(long, short = 'e')]
        experiment: String,

        /// Base job name; a timestamp suffix is appended
        #[arg(long, short = 'b')]
        base_job_name: String,

        /// S3 URI of the training data
        #[arg(long, short = 'd')]
        data_uri: String,

        /// Hyperparameters JSON file
        #[arg(long)]
        hyperparameters: Option<PathBuf>,

        /// Metric definitions JSON file
        #[arg(long, short = 'm')]
        metrics: Option<PathBuf>,

        /// Instance type override
        #[arg(long)]
        instance_type: Option<String>,

        /// Instance count override
        #[arg(long)]
        instance_count: Option<i32>,

        /// S3 URI of the staged sourcedir.tar.gz
        #[arg(long)]
        source_uri: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = match &cli.config {
        Some(path) => SeqforgeConfig::load_from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => SeqforgeConfig::default(),
    };

    // Override with CLI options
    if let Some(region) = cli.region {
        config.region = Some(region);
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    // Initialize logging on stderr; stdout carries JSON
    let filter = format!(
        "seqforge={},seqforge_cli={}",
        config.log_level, config.log_level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Some(path) = &cli.config {
        info!("Configuration loaded from: {}", path.display());
    }

    match cli.command {
        Commands::StoreAccess {
            store_id,
            store_type,
        } => {
            let access = commands::run_store_access(&config, &store_id, &store_type).await?;
            print_json(&access)?;
        }
        Commands::IamPolicy {
            s3_arn,
            key_arn,
            store_id,
            store_type,
        } => {
            let target = PolicyTarget::from_args(s3_arn, key_arn, store_id, store_type)?;
            let policy = commands::run_iam_policy(&config, target).await?;
            print_json(&policy)?;
        }
        Commands::Session => {
            let info = commands::run_session(&config).await?;
            print_json(&info)?;
        }
        Commands::Dashboard {
            job_name,
            user_profile,
        } => {
            let output = commands::run_dashboard(&config, &job_name, &user_profile).await?;
            print_json(&output)?;
        }
        Commands::Train {
            experiment,
            base_job_name,
            data_uri,
            hyperparameters,
            metrics,
            instance_type,
            instance_count,
            source_uri,
        } => {
            let args = TrainArgs {
                experiment_name: experiment,
                base_job_name,
                data_uri,
                hyperparameters,
                metrics,
                instance_type,
                instance_count,
                source_uri,
            };
            let output = commands::run_train(&config, args).await?;
            print_json(&output)?;
        }
    }

    Ok(())
}
