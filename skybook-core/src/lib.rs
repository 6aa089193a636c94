pub mod directory;

pub use directory::{CustomerDirectory, DirectoryError, FlightDirectory};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
