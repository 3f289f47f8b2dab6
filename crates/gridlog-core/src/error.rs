use thiserror::Error;

/// Core error type for gridlog operations.
#[derive(Error, Debug)]
pub enum GridlogError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Malformed accumulated state: {0}")]
    MalformedState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for GridlogError {
    fn from(e: serde_json::Error) -> Self {
        GridlogError::MalformedState(e.to_string())
    }
}

/// Result type alias using GridlogError.
pub type Result<T> = std::result::Result<T, GridlogError>;
