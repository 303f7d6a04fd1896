//! Error types for the palette_quant library

use thiserror::Error;

/// Result type alias for palette_quant operations
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Error types for palette extraction operations
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Invalid configuration value supplied by the caller
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Pixel buffer length does not match the declared dimensions
    #[error("Buffer size mismatch: {width}x{height} RGBA requires {expected} bytes, got {actual}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// Estimated working set exceeds the configured memory limit
    #[error("Memory limit exceeded: estimated {estimated_bytes} bytes (limit: {limit_mb} MB)")]
    MemoryLimitExceeded { estimated_bytes: u64, limit_mb: u64 },

    /// Generic processing error
    #[error("Processing error: {message}")]
    ProcessingError { message: String },
}

impl ExtractionError {
    /// Create an invalid-parameter error from any displayable value
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Create a generic processing error
    pub fn processing(message: impl Into<String>) -> Self {
        Self::ProcessingError {
            message: message.into(),
        }
    }

    /// Check if this error indicates bad caller input rather than an internal failure
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            ExtractionError::InvalidParameter { .. }
                | ExtractionError::BufferSizeMismatch { .. }
                | ExtractionError::MemoryLimitExceeded { .. }
        )
    }
}
