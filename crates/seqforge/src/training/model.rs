use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// NewType pattern for training job names
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrainingJobName(String);

impl TrainingJobName {
    /// Create from existing string
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrainingJobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hyperparameter value. The scheduler owns validation; nothing here
/// checks names or ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperparameterValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl HyperparameterValue {
    /// JSON encoding sent to the container, e.g. `"x"` becomes `"\"x\""`.
    ///
    /// Non-finite floats use the `NaN` / `Infinity` / `-Infinity` literals
    /// Python's `json` module reads back.
    pub fn encode(&self) -> String {
        match self {
            HyperparameterValue::Boolean(b) => b.to_string(),
            HyperparameterValue::Integer(i) => i.to_string(),
            HyperparameterValue::Float(f) if f.is_nan() => "NaN".to_string(),
            HyperparameterValue::Float(f) if *f == f64::INFINITY => "Infinity".to_string(),
            HyperparameterValue::Float(f) if *f == f64::NEG_INFINITY => "-Infinity".to_string(),
            HyperparameterValue::Float(f) => Value::from(*f).to_string(),
            HyperparameterValue::String(s) => Value::from(s.as_str()).to_string(),
        }
    }
}

impl From<&str> for HyperparameterValue {
    fn from(value: &str) -> Self {
        HyperparameterValue::String(value.to_string())
    }
}

impl From<String> for HyperparameterValue {
    fn from(value: String) -> Self {
        HyperparameterValue::String(value)
    }
}

impl From<i64> for HyperparameterValue {
    fn from(value: i64) -> Self {
        HyperparameterValue::Integer(value)
    }
}

impl From<f64> for HyperparameterValue {
    fn from(value: f64) -> Self {
        HyperparameterValue::Float(value)
    }
}

impl From<bool> for HyperparameterValue {
    fn from(value: bool) -> Self {
        HyperparameterValue::Boolean(value)
    }
}

pub type Hyperparameters = BTreeMap<String, HyperparameterValue>;

/// Metric scraped from the training log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDefinition {
    #[serde(alias = "name")]
    pub name: String,
    #[serde(alias = "regex")]
    pub regex: String,
}

impl MetricDefinition {
    pub fn new(name: impl Into<String>, regex: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            regex: regex.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputMode {
    File,
    Pipe,
    FastFile,
}

/// Training input channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputChannel {
    pub name: String,
    pub uri: String,
    pub mode: InputMode,
}

impl InputChannel {
    /// The `data` channel read in File mode
    pub fn data(uri: impl Into<String>) -> Self {
        Self {
            name: "data".to_string(),
            uri: uri.into(),
            mode: InputMode::File,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensorBoardOutput {
    pub s3_output_path: String,
    pub local_path: String,
}

/// Fully resolved training job configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingJobConfig {
    pub experiment_name: String,
    pub base_job_name: String,
    pub region: String,
    pub role: String,
    pub image_uri: String,
    pub instance_type: String,
    pub instance_count: i32,
    pub volume_size_gb: i32,
    pub max_runtime_seconds: i32,
    pub keep_alive_seconds: i32,
    pub distributed: bool,
    pub entry_point: String,
    pub source_uri: Option<String>,
    pub hyperparameters: Hyperparameters,
    pub metric_definitions: Vec<MetricDefinition>,
    pub output_path: String,
    pub tensorboard: TensorBoardOutput,
    pub tags: BTreeMap<String, String>,
}

impl TrainingJobConfig {
    /// Hyperparameters as submitted: the caller's values plus the entries
    /// the PyTorch framework container reads. Framework entries win.
    pub fn encoded_hyperparameters(&self) -> BTreeMap<String, String> {
        let mut encoded: BTreeMap<String, String> = self
            .hyperparameters
            .iter()
            .map(|(key, value)| (key.clone(), value.encode()))
            .collect();

        let mut framework: Vec<(&str, HyperparameterValue)> = vec![
            ("sagemaker_program", self.entry_point.as_str().into()),
            ("sagemaker_container_log_level", 20i64.into()),
            ("sagemaker_region", self.region.as_str().into()),
        ];
        if self.distributed {
            framework.push(("sagemaker_torch_distributed_enabled", true.into()));
        }
        if let Some(source_uri) = &self.source_uri {
            framework.push(("sagemaker_submit_directory", source_uri.as_str().into()));
        }

        for (key, value) in framework {
            encoded.insert(key.to_string(), value.encode());
        }
        encoded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_values() {
        assert_eq!(HyperparameterValue::from("x").encode(), "\"x\"");
        assert_eq!(HyperparameterValue::from(3i64).encode(), "3");
        assert_eq!(HyperparameterValue::from(0.001).encode(), "0.001");
        assert_eq!(HyperparameterValue::from(true).encode(), "true");
    }

    #[test]
    fn test_encode_non_finite_floats() {
        assert_eq!(HyperparameterValue::Float(f64::NAN).encode(), "NaN");
        assert_eq!(HyperparameterValue::Float(f64::INFINITY).encode(), "Infinity");
        assert_eq!(HyperparameterValue::Float(f64::NEG_INFINITY).encode(), "-Infinity");
    }

    #[test]
    fn test_deserialize_untagged() {
        let parsed: Hyperparameters = serde_json::from_str(
            r#"{"epochs": 3, "lr": 5e-4, "model_id": "hyena", "bf16": false}"#,
        )
        .unwrap();

        assert_eq!(parsed["epochs"], HyperparameterValue::Integer(3));
        assert_eq!(parsed["lr"], HyperparameterValue::Float(5e-4));
        assert_eq!(parsed["model_id"], HyperparameterValue::from("hyena"));
        assert_eq!(parsed["bf16"], HyperparameterValue::Boolean(false));
    }

    #[test]
    fn test_metric_definition_keys() {
        let metric: MetricDefinition =
            serde_json::from_str(r#"{"Name": "train_loss", "Regex": "loss: ([0-9.]+)"}"#).unwrap();
        assert_eq!(metric, MetricDefinition::new("train_loss", "loss: ([0-9.]+)"));

        let lowercase: MetricDefinition =
            serde_json::from_str(r#"{"name": "eval_loss", "regex": "eval: (.*)"}"#).unwrap();
        assert_eq!(lowercase.name, "eval_loss");
    }
}
