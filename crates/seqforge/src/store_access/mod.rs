pub mod aws_client;
pub mod client;
pub mod error;
pub mod in_memory_client;
pub mod model;
pub mod policy;
pub mod service;

pub use aws_client::AwsOmicsClient;
pub use client::OmicsClient;
pub use error::{StoreAccessError, StoreAccessResult};
pub use in_memory_client::InMemoryOmicsClient;
pub use model::{AccessInfo, StoreDescription, StoreHandle, StoreType};
pub use policy::{IamPolicyDocument, PolicyStatement, build_iam_policy};
pub use service::StoreAccessResolver;
