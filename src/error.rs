use thiserror::Error;

/// Crate-wide error type.
///
/// Variants group into four families: argument errors (duplicate or
/// unknown labels, malformed input, shape mismatches), range errors
/// (positions outside the frame or negative sparse-set indices), cast
/// errors (a cell cannot be represented as a requested type), and type
/// errors (a numeric-only aggregator applied to a non-numeric column).
#[derive(Error, Debug)]
pub enum Error {
    #[error("duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("label not found: {0}")]
    LabelNotFound(String),

    #[error("index out of bounds: index {index}, size {size}")]
    IndexOutOfBounds { index: usize, size: usize },

    #[error("negative index: {0}")]
    NegativeIndex(i64),

    #[error("inconsistent row count: expected {expected}, found {found}")]
    InconsistentRowCount { expected: usize, found: usize },

    #[error("cast error: {0}")]
    Cast(String),

    #[error("type error: {0}")]
    Type(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
