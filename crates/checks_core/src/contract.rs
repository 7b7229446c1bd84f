//! Data contract types.
//!
//! A contract is the parsed form of a dbt-style `schema.yml`: an ordered list
//! of models, each owning ordered columns, each owning ordered test
//! declarations.

use crate::{ContractError, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use serde_json::{Map, Value};

/// Named arguments of a parameterized test declaration.
pub type Arguments = Map<String, Value>;

/// A parsed data contract.
///
/// Immutable once loaded. Models keep the order in which they were declared.
/// Models whose test declarations could not be resolved are kept aside in
/// `rejected` and only reported when they are looked up.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Contract {
    /// Models defined in the contract, in document order
    pub models: Vec<Model>,

    /// Resolution errors of models that are not usable, one per model name
    #[serde(skip)]
    pub rejected: Vec<ContractError>,
}

impl Contract {
    /// Creates a contract from a list of models.
    pub fn new(models: Vec<Model>) -> Self {
        Self {
            models,
            rejected: Vec::new(),
        }
    }

    /// Creates a contract that also carries the errors of unusable models.
    ///
    /// Each error must name the model it belongs to and must shadow every
    /// declaration of that name in `models`.
    pub fn with_rejected(models: Vec<Model>, rejected: Vec<ContractError>) -> Self {
        Self { models, rejected }
    }

    /// Locates a model by name.
    ///
    /// Performs a linear scan; when the name is declared more than once the
    /// first declaration wins.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ModelNotFound` if no model carries that name,
    /// or the stored resolution error if the first declaration of that name
    /// was rejected while loading.
    ///
    /// # Example
    ///
    /// ```rust
    /// use checks_core::{Contract, ContractError, Model};
    ///
    /// let contract = Contract::new(vec![Model::new("orders")]);
    /// assert!(contract.find_model("orders").is_ok());
    /// assert!(matches!(
    ///     contract.find_model("customers"),
    ///     Err(ContractError::ModelNotFound { .. })
    /// ));
    /// ```
    pub fn find_model(&self, name: &str) -> Result<&Model> {
        if let Some(err) = self.rejected.iter().find(|err| err.model() == Some(name)) {
            return Err(err.clone());
        }
        self.models
            .iter()
            .find(|model| model.name == name)
            .ok_or_else(|| ContractError::model_not_found(name))
    }

    /// Names of all models, in document order.
    pub fn model_names(&self) -> Vec<&str> {
        self.models.iter().map(|m| m.name.as_str()).collect()
    }
}

/// A named logical table definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Model {
    /// Model name, used for lookup
    pub name: String,

    /// Optional human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Columns in declaration order
    pub columns: Vec<Column>,
}

impl Model {
    /// Creates a model with no columns.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            columns: Vec::new(),
        }
    }

    /// Total number of test declarations across all columns.
    pub fn test_count(&self) -> usize {
        self.columns.iter().map(|c| c.tests.len()).sum()
    }
}

/// A column of a model together with its test declarations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Column {
    /// Column name, unique within its model
    pub name: String,

    /// Optional human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Test declarations in the order they appear
    pub tests: Vec<TestDeclaration>,
}

impl Column {
    /// Creates a column with no tests.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            tests: Vec::new(),
        }
    }
}

/// A column-level test assertion.
///
/// Contracts spell tests in two shapes: a bare name (`- not_null`) or a
/// single-key mapping whose body may carry an `arguments` mapping
/// (`- accepted_values: {arguments: {values: [a, b]}}`). The shape is
/// resolved once, when the contract is loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum TestDeclaration {
    /// A parameterless test, e.g. `not_null`
    Bare {
        /// Test kind
        kind: String,
    },

    /// A test with named arguments, e.g. `accepted_values`
    Parameterized {
        /// Test kind
        kind: String,
        /// Named arguments (empty when the declaration has none)
        arguments: Arguments,
    },
}

impl TestDeclaration {
    /// Creates a bare test declaration.
    pub fn bare(kind: impl Into<String>) -> Self {
        Self::Bare { kind: kind.into() }
    }

    /// Creates a parameterized test declaration.
    pub fn parameterized(kind: impl Into<String>, arguments: Arguments) -> Self {
        Self::Parameterized {
            kind: kind.into(),
            arguments,
        }
    }

    /// The declared test kind.
    pub fn kind(&self) -> &str {
        match self {
            Self::Bare { kind } | Self::Parameterized { kind, .. } => kind,
        }
    }

    /// Looks up a named argument.
    ///
    /// Returns `None` for bare declarations, for missing arguments and for
    /// arguments explicitly set to null. Falsy values such as `0` or `false`
    /// are returned as present.
    pub fn argument(&self, name: &str) -> Option<&Value> {
        match self {
            Self::Bare { .. } => None,
            Self::Parameterized { arguments, .. } => {
                arguments.get(name).filter(|value| !value.is_null())
            }
        }
    }

    /// Resolves a raw document value into a test declaration.
    ///
    /// On failure returns a description of what is wrong with the value; the
    /// caller attaches the model/column context.
    pub fn from_value(value: &Value) -> std::result::Result<Self, String> {
        match value {
            Value::String(kind) => {
                if kind.trim().is_empty() {
                    return Err("test name is empty".to_string());
                }
                Ok(Self::bare(kind.as_str()))
            }
            Value::Object(entries) => {
                let mut iter = entries.iter();
                let (kind, body) = match (iter.next(), iter.next()) {
                    (Some(entry), None) => entry,
                    _ => {
                        return Err(format!(
                            "expected a mapping with exactly one test name, found {} keys",
                            entries.len()
                        ));
                    }
                };
                if kind.trim().is_empty() {
                    return Err("test name is empty".to_string());
                }

                let arguments = match body {
                    Value::Null => Arguments::new(),
                    Value::Object(body) => match body.get("arguments") {
                        None | Some(Value::Null) => Arguments::new(),
                        Some(Value::Object(arguments)) => arguments.clone(),
                        Some(other) => {
                            return Err(format!(
                                "`arguments` of test '{}' must be a mapping, found {}",
                                kind,
                                value_kind(other)
                            ));
                        }
                    },
                    other => {
                        return Err(format!(
                            "body of test '{}' must be a mapping, found {}",
                            kind,
                            value_kind(other)
                        ));
                    }
                };

                Ok(Self::parameterized(kind.as_str(), arguments))
            }
            other => Err(format!(
                "expected a test name or a single-key mapping, found {}",
                value_kind(other)
            )),
        }
    }
}

impl Serialize for TestDeclaration {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Bare { kind } => serializer.serialize_str(kind),
            Self::Parameterized { kind, arguments } => {
                let mut body = Map::new();
                body.insert("arguments".to_string(), Value::Object(arguments.clone()));
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(kind, &body)?;
                map.end()
            }
        }
    }
}

/// Short name of a JSON value's type, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
