//! HealthOmics store access and SageMaker training launcher
//!
//! Three independent façades over the AWS SDKs:
//! - [`StoreAccessResolver`] resolves S3 access details and IAM policies for
//!   HealthOmics sequence and reference stores.
//! - [`SessionContext`] resolves region, default bucket and execution role
//!   once, and builds TensorBoard dashboard URLs.
//! - [`TrainingJobLauncher`] configures and runs SageMaker training jobs.

pub mod config;
pub mod error;
pub mod sagemaker;
pub mod session;
pub mod store_access;
pub mod training;

// Re-export config types
pub use config::{SeqforgeConfig, TrainingDefaults};

// Re-export error types
pub use error::{RemoteError, Result, SeqforgeError};

// Re-export facade types
pub use session::{SessionContext, SessionInfo};
pub use store_access::{AccessInfo, IamPolicyDocument, StoreAccessResolver, StoreType, build_iam_policy};
pub use training::{TrainingJobConfig, TrainingJobLauncher, TrainingJobName};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::session::SessionContext;
    pub use crate::store_access::{StoreAccessResolver, StoreType};
    pub use crate::training::{Hyperparameters, MetricDefinition, TrainingJobLauncher};
}
