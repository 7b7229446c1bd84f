//! Error types for data contracts.
//!
//! This module defines the errors raised while locating models and resolving
//! test declarations inside a contract.

use thiserror::Error;

/// Result type for data contract operations.
pub type Result<T> = std::result::Result<T, ContractError>;

/// Main error type for data contract operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// The requested model is not defined in the contract
    #[error("Model {model} not found in contract")]
    ModelNotFound {
        /// Name that was looked up
        model: String,
    },

    /// A test declaration is neither a bare name nor a single-key mapping
    #[error(
        "Malformed test declaration #{position} on column '{column}' of model '{model}': {reason}"
    )]
    MalformedTestDeclaration {
        /// Model owning the column
        model: String,
        /// Column owning the declaration
        column: String,
        /// 1-based position of the declaration in the column's test list
        position: usize,
        /// What was wrong with it
        reason: String,
    },

    /// A column spells its test list both as `tests` and as `data_tests`
    #[error(
        "Column '{column}' of model '{model}' declares both `tests` and `data_tests`; keep only one"
    )]
    ConflictingTestLists {
        /// Model owning the column
        model: String,
        /// Column declaring both lists
        column: String,
    },

    /// Two compilation jobs target the same sink
    #[error("Output path '{0}' is targeted by more than one job")]
    DuplicateOutput(String),
}

impl ContractError {
    /// Creates a new model-not-found error.
    pub fn model_not_found(model: impl Into<String>) -> Self {
        Self::ModelNotFound {
            model: model.into(),
        }
    }

    /// Creates a new malformed test declaration error.
    pub fn malformed(
        model: impl Into<String>,
        column: impl Into<String>,
        position: usize,
        reason: impl Into<String>,
    ) -> Self {
        Self::MalformedTestDeclaration {
            model: model.into(),
            column: column.into(),
            position,
            reason: reason.into(),
        }
    }

    /// Name of the model the error is about, if it concerns a single model.
    pub fn model(&self) -> Option<&str> {
        match self {
            Self::ModelNotFound { model }
            | Self::MalformedTestDeclaration { model, .. }
            | Self::ConflictingTestLists { model, .. } => Some(model),
            Self::DuplicateOutput(_) => None,
        }
    }
}
