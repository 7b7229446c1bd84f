//! Builder pattern for creating data contracts.
//!
//! This module provides ergonomic builders for constructing contracts,
//! models and columns with a fluent API. They are mostly used by tests and
//! by callers that assemble contracts programmatically instead of parsing
//! them.

use crate::{Arguments, Column, Contract, Model, TestDeclaration};
use serde_json::Value;

/// Builder for creating a `Contract`.
///
/// # Example
///
/// ```rust
/// use checks_core::{ContractBuilder, ModelBuilder};
///
/// let contract = ContractBuilder::new()
///     .model(ModelBuilder::new("orders").build())
///     .model(ModelBuilder::new("customers").build())
///     .build();
///
/// assert_eq!(contract.model_names(), vec!["orders", "customers"]);
/// ```
#[derive(Debug, Default)]
pub struct ContractBuilder {
    models: Vec<Model>,
}

impl ContractBuilder {
    /// Creates an empty contract builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a model.
    pub fn model(mut self, model: Model) -> Self {
        self.models.push(model);
        self
    }

    /// Builds the contract.
    pub fn build(self) -> Contract {
        Contract::new(self.models)
    }
}

/// Builder for creating a `Model`.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    name: String,
    description: Option<String>,
    columns: Vec<Column>,
}

impl ModelBuilder {
    /// Creates a new model builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the model description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a column.
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds multiple columns.
    pub fn columns(mut self, columns: Vec<Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Builds the model.
    pub fn build(self) -> Model {
        Model {
            name: self.name,
            description: self.description,
            columns: self.columns,
        }
    }
}

/// Builder for creating a `Column`.
///
/// # Example
///
/// ```rust
/// use checks_core::ColumnBuilder;
/// use serde_json::json;
///
/// let column = ColumnBuilder::new("status")
///     .description("Order status")
///     .not_null()
///     .accepted_values(vec![json!("placed"), json!("shipped")])
///     .build();
///
/// assert_eq!(column.tests.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ColumnBuilder {
    name: String,
    description: Option<String>,
    tests: Vec<TestDeclaration>,
}

impl ColumnBuilder {
    /// Creates a new column builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Sets the column description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds an arbitrary test declaration.
    pub fn test(mut self, test: TestDeclaration) -> Self {
        self.tests.push(test);
        self
    }

    /// Adds a bare `not_null` test.
    pub fn not_null(self) -> Self {
        self.test(TestDeclaration::bare("not_null"))
    }

    /// Adds a bare `unique` test.
    pub fn unique(self) -> Self {
        self.test(TestDeclaration::bare("unique"))
    }

    /// Adds an `accepted_values` test.
    pub fn accepted_values(self, values: Vec<Value>) -> Self {
        let mut arguments = Arguments::new();
        arguments.insert("values".to_string(), Value::Array(values));
        self.test(TestDeclaration::parameterized("accepted_values", arguments))
    }

    /// Adds a `dbt_expectations.expect_column_values_to_be_between` test.
    ///
    /// A `None` bound is left out of the arguments entirely.
    pub fn between(self, min_value: Option<Value>, max_value: Option<Value>) -> Self {
        let mut arguments = Arguments::new();
        if let Some(min) = min_value {
            arguments.insert("min_value".to_string(), min);
        }
        if let Some(max) = max_value {
            arguments.insert("max_value".to_string(), max);
        }
        self.test(TestDeclaration::parameterized(
            "dbt_expectations.expect_column_values_to_be_between",
            arguments,
        ))
    }

    /// Builds the column.
    pub fn build(self) -> Column {
        Column {
            name: self.name,
            description: self.description,
            tests: self.tests,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_column_builder_keeps_declaration_order() {
        let column = ColumnBuilder::new("id")
            .unique()
            .not_null()
            .unique()
            .build();

        let kinds: Vec<&str> = column.tests.iter().map(|t| t.kind()).collect();
        assert_eq!(kinds, vec!["unique", "not_null", "unique"]);
    }

    #[test]
    fn test_between_omits_missing_bounds() {
        let column = ColumnBuilder::new("amount")
            .between(Some(json!(10)), None)
            .build();

        let test = &column.tests[0];
        assert_eq!(test.argument("min_value"), Some(&json!(10)));
        assert_eq!(test.argument("max_value"), None);
    }

    #[test]
    fn test_model_builder() {
        let model = ModelBuilder::new("orders")
            .description("Orders fact table")
            .column(ColumnBuilder::new("a").not_null().build())
            .columns(vec![
                ColumnBuilder::new("b").build(),
                ColumnBuilder::new("c").unique().build(),
            ])
            .build();

        assert_eq!(model.name, "orders");
        assert_eq!(model.columns.len(), 3);
        assert_eq!(model.test_count(), 2);
    }
}
