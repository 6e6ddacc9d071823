use thiserror::Error;

/// Errors surfaced by the table store and the query/update service.
///
/// The HTTP layer maps each variant to a status code in
/// [`ApiError`](crate::api::ApiError).
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Table absent or license id missing. HTTP 404.
    #[error("{0}")]
    NotFound(String),

    /// Input rejected before anything was persisted. HTTP 422.
    #[error("{0}")]
    Validation(String),

    /// Table unreadable, corrupt, or could not be written. HTTP 500.
    #[error("{0}")]
    Storage(String),
}

impl From<csv::Error> for ServiceError {
    fn from(err: csv::Error) -> Self {
        ServiceError::Storage(format!("csv: {err}"))
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::Storage(format!("io: {err}"))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
