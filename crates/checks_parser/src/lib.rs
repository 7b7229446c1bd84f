//! Loader for dbt-style data contracts (YAML/TOML formats).
//!
//! This module parses `schema.yml`-style documents into the strongly-typed
//! `Contract` structure. Test declarations are resolved into
//! [`TestDeclaration`](checks_core::TestDeclaration) variants while loading.
//! A model with a malformed declaration is set aside and its error is
//! returned when that model is looked up; other models stay usable.
//!
//! # Example
//!
//! ```rust
//! use checks_parser::parse_yaml;
//!
//! let yaml = r#"
//! version: 2
//! models:
//!   - name: rolling_30_day_orders
//!     columns:
//!       - name: order_date
//!         tests:
//!           - not_null
//!           - unique
//! "#;
//!
//! let contract = parse_yaml(yaml).expect("Failed to parse contract");
//! let model = contract.find_model("rolling_30_day_orders").unwrap();
//! assert_eq!(model.columns[0].tests.len(), 2);
//! ```

mod raw;

use checks_core::{Contract, ContractError, Model};
use raw::RawDocument;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during contract parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,

    /// The document parsed but its content is not a usable contract
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported contract file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContractFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a contract from a YAML string.
///
/// # Example
///
/// ```rust
/// use checks_parser::parse_yaml;
///
/// let yaml = r#"
/// models:
///   - name: at_risk_customers
///     columns:
///       - name: customer_id
/// "#;
///
/// let contract = parse_yaml(yaml).unwrap();
/// assert_eq!(contract.model_names(), vec!["at_risk_customers"]);
/// ```
pub fn parse_yaml(content: &str) -> Result<Contract> {
    let document: RawDocument = serde_yaml_ng::from_str(content)?;
    Ok(document.resolve())
}

/// Parse a contract from a TOML string.
///
/// # Example
///
/// ```rust
/// use checks_parser::parse_toml;
///
/// let toml = r#"
/// [[models]]
/// name = "orders"
///
/// [[models.columns]]
/// name = "order_id"
/// tests = ["not_null", "unique"]
/// "#;
///
/// let contract = parse_toml(toml).unwrap();
/// assert_eq!(contract.models[0].columns[0].tests.len(), 2);
/// ```
pub fn parse_toml(content: &str) -> Result<Contract> {
    let document: RawDocument =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(document.resolve())
}

/// Detect the contract format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `ContractFormat::Yaml`
/// * `.toml` → `ContractFormat::Toml`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<ContractFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(ContractFormat::Yaml),
        "toml" => Ok(ContractFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a contract from a file with automatic format detection.
///
/// ```no_run
/// use checks_parser::parse_file;
/// use std::path::Path;
///
/// let contract = parse_file(Path::new("models/ddi/schema.yml")).unwrap();
/// println!("Loaded {} models", contract.models.len());
/// ```
pub fn parse_file(path: &Path) -> Result<Contract> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), ?format, "parsing contract");

    match format {
        ContractFormat::Yaml => parse_yaml(&content),
        ContractFormat::Toml => parse_toml(&content),
    }
}

/// Parse a contract file and return the named model.
///
/// # Errors
///
/// Besides the errors of [`parse_file`], returns
/// `ParserError::Contract(ContractError::ModelNotFound)` when the model is
/// not declared in the file, and the model's resolution error when its test
/// declarations are malformed.
pub fn load_model(path: &Path, model_name: &str) -> Result<Model> {
    let contract = parse_file(path)?;
    let model = contract.find_model(model_name)?;
    Ok(model.clone())
}
