//! Error types for spamtree
//!
//! Every fatal condition aborts the whole evaluation before a `ResultSet` is
//! exposed. Degenerate train/test splits are not errors; they are recorded on
//! the trial itself (see [`crate::results::TrialStatus`]).

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// spamtree error types
#[derive(Error, Debug)]
pub enum Error {
    /// Required column missing or holding unusable values
    #[error("Schema error: {0}\nExpected columns: Body, Sender, Spam (BodyLength optional)")]
    Schema(String),

    /// Feature construction failed (unseen category, missing numeric value)
    #[error("Feature error: {0}")]
    Feature(String),

    /// Configuration value outside its accepted range
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Core API called with inputs it cannot work with
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Storage error (CSV/Parquet)
    #[error("Storage error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
