//! Check expressions and check groups.
//!
//! These are the compiler's output types. They are pure data and serialize
//! to the SodaCL layout:
//!
//! ```yaml
//! checks for dbt_ddi.orders:
//!   - row_count > 0:
//!       name: Has some rows
//!   - invalid_percent(status) = 0:
//!       name: status values are accepted
//!       valid values:
//!         - placed
//!         - shipped
//! ```

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use serde_json::Value;

/// A single executable check condition with its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckExpression {
    /// Condition in the checks language, e.g. `missing_count(id) = 0`
    pub condition: String,

    /// Human-readable check name
    pub name: String,

    /// Accepted values, for `invalid_percent` checks
    pub valid_values: Option<Vec<Value>>,
}

impl CheckExpression {
    /// Creates a check without auxiliary metadata.
    pub fn new(condition: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            condition: condition.into(),
            name: name.into(),
            valid_values: None,
        }
    }

    /// Attaches the accepted-values set.
    pub fn with_valid_values(mut self, values: Vec<Value>) -> Self {
        self.valid_values = Some(values);
        self
    }
}

#[derive(Serialize)]
struct CheckAttributes<'a> {
    name: &'a str,
    #[serde(rename = "valid values", skip_serializing_if = "Option::is_none")]
    valid_values: Option<&'a Vec<Value>>,
}

impl Serialize for CheckExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let attributes = CheckAttributes {
            name: &self.name,
            valid_values: self.valid_values.as_ref(),
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.condition, &attributes)?;
        map.end()
    }
}

/// All checks compiled for one target table.
///
/// Serializes as a single-entry mapping from `checks for <table>` to the
/// checks, in the order they were produced.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckGroup {
    /// Target table identifier, independent of the model name
    pub table: String,

    /// Checks in emission order
    pub checks: Vec<CheckExpression>,
}

impl CheckGroup {
    /// Creates a check group for a table.
    pub fn new(table: impl Into<String>, checks: Vec<CheckExpression>) -> Self {
        Self {
            table: table.into(),
            checks,
        }
    }

    /// The top-level key of the serialized group.
    pub fn key(&self) -> String {
        format!("checks for {}", self.table)
    }

    /// Number of checks in the group.
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Whether the group has no checks.
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Serialize for CheckGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key(), &self.checks)?;
        map.end()
    }
}
