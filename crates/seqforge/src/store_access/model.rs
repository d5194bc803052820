use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::StoreAccessError;

/// HealthOmics store kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StoreType {
    /// Sequence store holding read sets
    Sequence,
    /// Reference store holding genome references
    Reference,
}

impl StoreType {
    /// Parse a caller-supplied store type, case-insensitively
    pub fn parse(value: &str) -> Result<Self, StoreAccessError> {
        value
            .parse()
            .map_err(|_| StoreAccessError::InvalidStoreType(value.to_string()))
    }

    /// Suffix appended to the store's S3 URI to reach its data
    pub fn data_suffix(&self) -> &'static str {
        match self {
            StoreType::Sequence => "readSet/",
            StoreType::Reference => "reference/",
        }
    }
}

/// A store as named by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreHandle {
    pub store_type: StoreType,
    pub store_id: String,
}

impl StoreHandle {
    pub fn new(store_type: StoreType, store_id: impl Into<String>) -> Self {
        Self {
            store_type,
            store_id: store_id.into(),
        }
    }
}

/// Store metadata as reported by the HealthOmics API.
///
/// Every field is optional because the service omits S3 access for
/// reference stores.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreDescription {
    pub s3_uri: Option<String>,
    pub s3_access_point_arn: Option<String>,
    pub key_arn: Option<String>,
}

/// Resolved access information for a store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessInfo {
    pub store_type: StoreType,
    pub s3_uri: String,
    pub s3_arn: String,
    pub key_arn: String,
    pub data_uri: String,
}
