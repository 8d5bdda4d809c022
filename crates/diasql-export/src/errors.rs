use thiserror::Error;

/// Errors emitted while writing model exports.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
