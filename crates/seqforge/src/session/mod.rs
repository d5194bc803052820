pub mod context;
pub mod error;
pub mod identity;
pub mod metadata;
pub mod model;

pub use context::SessionContext;
pub use error::{SessionError, SessionResult};
pub use identity::{AmbientIdentity, StaticIdentity, StsAmbientIdentity, execution_role_from_arn};
pub use metadata::{ResourceMetadata, tensorboard_url};
pub use model::{CallerIdentity, SessionInfo};
