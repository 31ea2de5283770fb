use thiserror::Error;

/// Convenience result type used across the crate.
pub type EvalResult<T> = Result<T, EvalError>;

/// Error type returned by ingestion, table utilities and the statistics engine.
///
/// Sparse data (empty partitions, zero totals) is never an error; it surfaces as NaN cells in
/// the returned tables.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be parsed.
    #[error("config error: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more requested columns are absent from the input table.
    ///
    /// All missing names are reported at once, in request order.
    #[error("following columns are not present in the dataset: {columns:?}")]
    MissingColumns { columns: Vec<String> },

    /// Tables (or a table and its source file) do not have compatible shapes.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// The worker pool of the execution engine could not be started.
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A value could not be parsed into the required [`crate::types::DataType`].
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}
