//! Test kind dispatch and expansion rules.
//!
//! Each recognized test kind expands into zero or more check expressions:
//! - `not_null` (bare): missing values
//! - `unique` (bare): duplicate values
//! - `accepted_values` (parameterized): invalid percentage, with the accepted set
//! - `dbt_expectations.expect_column_values_to_be_between` (parameterized): min/max bounds
//!
//! Kinds are matched together with their declared shape. Anything else is
//! not recognized and expands to nothing.

use checks_core::{CheckExpression, TestDeclaration};
use serde_json::Value;

/// Kind name of the bounded numeric range test.
pub const VALUES_BETWEEN: &str = "dbt_expectations.expect_column_values_to_be_between";

/// A recognized test kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestKind {
    /// Bare `not_null`
    NotNull,
    /// Bare `unique`
    Unique,
    /// Parameterized `accepted_values`
    AcceptedValues,
    /// Parameterized range expectation
    ValuesBetween,
}

impl TestKind {
    /// Resolves the kind of a declaration, or `None` when it is not recognized.
    pub fn of(test: &TestDeclaration) -> Option<Self> {
        match test {
            TestDeclaration::Bare { kind } => match kind.as_str() {
                "not_null" => Some(Self::NotNull),
                "unique" => Some(Self::Unique),
                _ => None,
            },
            TestDeclaration::Parameterized { kind, .. } => match kind.as_str() {
                "accepted_values" => Some(Self::AcceptedValues),
                VALUES_BETWEEN => Some(Self::ValuesBetween),
                _ => None,
            },
        }
    }

    /// Expands a declaration of this kind on `column` into check expressions.
    pub fn expand(self, column: &str, test: &TestDeclaration) -> Vec<CheckExpression> {
        match self {
            Self::NotNull => vec![CheckExpression::new(
                format!("missing_count({column}) = 0"),
                format!("No missing values in {column}"),
            )],
            Self::Unique => vec![CheckExpression::new(
                format!("duplicate_count({column}) = 0"),
                format!("No duplicates in {column}"),
            )],
            Self::AcceptedValues => {
                let values = match test.argument("values") {
                    Some(Value::Array(values)) => values.clone(),
                    Some(single) => vec![single.clone()],
                    None => Vec::new(),
                };
                vec![
                    CheckExpression::new(
                        format!("invalid_percent({column}) = 0"),
                        format!("{column} values are accepted"),
                    )
                    .with_valid_values(values),
                ]
            }
            Self::ValuesBetween => {
                let mut checks = Vec::with_capacity(2);
                if let Some(min) = test.argument("min_value").map(literal) {
                    checks.push(CheckExpression::new(
                        format!("min({column}) >= {min}"),
                        format!("{column} min {min}"),
                    ));
                }
                if let Some(max) = test.argument("max_value").map(literal) {
                    checks.push(CheckExpression::new(
                        format!("max({column}) <= {max}"),
                        format!("{column} max {max}"),
                    ));
                }
                checks
            }
        }
    }
}

/// Renders an argument value as written in the contract.
///
/// Strings are inserted without quotes; numbers and booleans keep their
/// literal form.
pub fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
