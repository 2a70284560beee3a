use thiserror::Error;

/// Convenience result type used across the crate.
pub type ForensicsResult<T> = Result<T, ForensicsError>;

/// Error type returned by loaders and selection entry points.
///
/// Statistics never fail: empty or fully ignored columns produce empty / zero-filled results.
#[derive(Debug, Error)]
pub enum ForensicsError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Spreadsheet loading error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV loading error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A selection event could not be decoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input does not have a loadable shape (no header row, no sheets, unknown format).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A local-scope mutation named a column that is not in the table.
    #[error("unknown column '{id}'")]
    UnknownColumn { id: String },

    /// A selection event is missing a required part.
    #[error("invalid selection event: {message}")]
    InvalidEvent { message: String },

    /// A selection key that would select nothing specific (e.g. an empty n-gram).
    #[error("invalid selection key: {message}")]
    InvalidKey { message: String },

    /// A display order references rows outside the table.
    #[error("invalid row order: {message}")]
    InvalidRowOrder { message: String },

    /// N-gram windows must be at least one character wide.
    #[error("n-gram length must be >= 1")]
    InvalidNGramLength,
}
