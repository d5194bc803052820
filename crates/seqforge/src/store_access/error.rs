use thiserror::Error;

use crate::error::RemoteError;

#[derive(Error, Debug)]
pub enum StoreAccessError {
    #[error("store_type must be either 'sequence' or 'reference', got '{0}'")]
    InvalidStoreType(String),

    #[error("Store {store_id} metadata has no {field}")]
    MissingField {
        store_id: String,
        field: &'static str,
    },

    #[error("Reference store {0} does not expose S3 access")]
    ReferenceAccessUnavailable(String),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type StoreAccessResult<T> = Result<T, StoreAccessError>;
