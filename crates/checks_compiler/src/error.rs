//! Error types for compilation and emission.

use checks_core::ContractError;
use checks_parser::ParserError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while serializing or writing a check group.
#[derive(Debug, Error)]
pub enum EmitError {
    /// YAML serialization failed
    #[error("Failed to serialize checks as YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON serialization failed
    #[error("Failed to serialize checks as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The sink could not be written
    #[error("Failed to write checks to '{}': {source}", path.display())]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Unsupported output extension
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Output path has no extension
    #[error("Invalid or missing output file extension")]
    InvalidExtension,
}

impl EmitError {
    /// Creates a new sink write error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors that can occur while running a compilation job end to end.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The contract could not be loaded
    #[error(transparent)]
    Parser(#[from] ParserError),

    /// The contract does not satisfy the job
    #[error(transparent)]
    Contract(#[from] ContractError),

    /// The check group could not be written
    #[error(transparent)]
    Emit(#[from] EmitError),

    /// The job manifest could not be read or parsed
    #[error("Invalid job manifest: {0}")]
    Manifest(String),
}

impl CompileError {
    /// Creates a new manifest error.
    pub fn manifest(message: impl Into<String>) -> Self {
        Self::Manifest(message.into())
    }

    /// Whether the error is a missing model, as opposed to an I/O or parse failure.
    pub fn is_model_not_found(&self) -> bool {
        matches!(
            self,
            Self::Contract(ContractError::ModelNotFound { .. })
                | Self::Parser(ParserError::Contract(ContractError::ModelNotFound { .. }))
        )
    }
}

/// Result type alias for compilation jobs.
pub type Result<T> = std::result::Result<T, CompileError>;
