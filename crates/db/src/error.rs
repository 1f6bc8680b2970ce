//! Errors raised by the data layer.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by a [`DocumentStore`](crate::DocumentStore) or the
/// repository plugins layered over it.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The identifier is not in the format the backend assigns.
    #[error("invalid identifier '{0}'")]
    InvalidId(String),

    /// A record could not be converted to or from its stored document.
    #[error("document mapping failed: {0}")]
    Mapping(#[from] serde_json::Error),

    /// The document handed to the store is not a JSON object.
    #[error("expected a JSON object for collection '{0}'")]
    NotAnObject(String),

    #[error("unsupported store endpoint '{0}'")]
    UnsupportedEndpoint(String),

    /// Anything the backend itself reports (connection loss, driver errors).
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[cfg(feature = "mongodb")]
impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Backend(anyhow::Error::new(err))
    }
}
