use thiserror::Error;

/// Errors signalled by the bounds, aggregation and lookup functions.
///
/// Missing or NaN data values are never reported here; they are skipped by
/// every scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DatasetError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unknown key: '{0}'")]
    UnknownKey(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),
}

pub type Result<T> = std::result::Result<T, DatasetError>;
