use chrono::{DateTime, Utc};

/// SageMaker resource names are capped at 63 characters.
const MAX_NAME_LENGTH: usize = 63;

/// Append a millisecond timestamp to `base`, trimming `base` so the result
/// stays within the SageMaker name limit.
pub fn unique_name(base: &str, now: DateTime<Utc>) -> String {
    let timestamp = now.format("%Y-%m-%d-%H-%M-%S-%3f").to_string();
    let keep = MAX_NAME_LENGTH - timestamp.len() - 1;
    let trimmed: String = base.chars().take(keep).collect();
    format!("{}-{}", trimmed, timestamp)
}
