use thiserror::Error;

use crate::store::StoreError;

pub(crate) mod enrollments;
pub(crate) mod storage;
pub(crate) mod submission_status;
pub(crate) mod submissions;
pub(crate) mod tasks;

/// Failure taxonomy shared by every operation in this layer. The HTTP
/// layer maps each variant to a status code; nothing here retries.
#[derive(Debug, Error)]
pub(crate) enum ServiceError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidArgument(String),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{context}: {message}")]
    Upstream { context: &'static str, message: String },
}

impl ServiceError {
    pub(crate) fn upstream(context: &'static str, err: impl std::fmt::Display) -> Self {
        ServiceError::Upstream { context, message: err.to_string() }
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        ServiceError::upstream("key-value store request failed", err)
    }
}
