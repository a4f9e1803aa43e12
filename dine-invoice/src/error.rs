//! Error types for the invoice library

use thiserror::Error;

/// Invoice error types
#[derive(Debug, Error)]
pub enum InvoiceError {
    /// IO error while writing the document
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Layout cannot be produced (e.g. content wider than the page)
    #[error("Layout error: {0}")]
    Layout(String),

    /// Input data rejected by the renderer
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for invoice operations
pub type InvoiceResult<T> = Result<T, InvoiceError>;
