use thiserror::Error;

use crate::types::{SchemaError, UnknownDataTypeError};

/// Unified error type covering validation, input decoding, and I/O.
///
/// Returned by [`compile()`](crate::compile) and the CLI entry points.
#[derive(Debug, Error)]
pub enum RulesmithError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    DataType(#[from] UnknownDataTypeError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
