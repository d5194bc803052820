pub mod error;
pub mod launcher;
pub mod model;
pub mod naming;

pub use error::{TrainingError, TrainingResult};
pub use launcher::TrainingJobLauncher;
pub use model::{
    HyperparameterValue, Hyperparameters, InputChannel, InputMode, MetricDefinition,
    TensorBoardOutput, TrainingJobConfig, TrainingJobName,
};
pub use naming::unique_name;
