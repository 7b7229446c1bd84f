//! Main compilation engine.
//!
//! `CheckCompiler` walks a model's columns in order and expands every test
//! declaration into check expressions. It holds no state between calls:
//! compiling the same model twice yields identical groups.

use crate::TestKind;
use checks_core::{CheckExpression, CheckGroup, Column, Contract, Model, Result};
use tracing::debug;

/// A declaration the compiler does not recognize and therefore skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedTest {
    /// Column carrying the declaration
    pub column: String,
    /// Declared kind
    pub kind: String,
}

/// Compiles models into check groups.
///
/// # Example
///
/// ```rust
/// use checks_compiler::CheckCompiler;
/// use checks_core::{ColumnBuilder, ModelBuilder};
///
/// let model = ModelBuilder::new("orders")
///     .column(ColumnBuilder::new("order_id").not_null().build())
///     .build();
///
/// let group = CheckCompiler::new().compile(&model, "dbt_ddi.orders");
///
/// assert_eq!(group.key(), "checks for dbt_ddi.orders");
/// assert_eq!(group.checks[0].condition, "row_count > 0");
/// assert_eq!(group.checks[1].condition, "missing_count(order_id) = 0");
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct CheckCompiler;

impl CheckCompiler {
    /// Creates a new compiler.
    pub fn new() -> Self {
        Self
    }

    /// The check prepended to every group.
    pub fn row_count_check() -> CheckExpression {
        CheckExpression::new("row_count > 0", "Has some rows")
    }

    /// Compiles a model into the check group for `table`.
    ///
    /// The row count check always comes first, followed by each column's
    /// checks in column order and declaration order. Nothing is sorted or
    /// deduplicated.
    pub fn compile(&self, model: &Model, table: &str) -> CheckGroup {
        let mut checks = vec![Self::row_count_check()];
        for column in &model.columns {
            checks.extend(self.compile_column(&model.name, column));
        }

        debug!(
            model = %model.name,
            table,
            checks = checks.len(),
            "compiled model"
        );
        CheckGroup::new(table, checks)
    }

    /// Looks up `model_name` in the contract and compiles it.
    ///
    /// # Errors
    ///
    /// Returns `ContractError::ModelNotFound` when the model is absent, or
    /// the model's resolution error when it was rejected while loading.
    pub fn compile_model(
        &self,
        contract: &Contract,
        model_name: &str,
        table: &str,
    ) -> Result<CheckGroup> {
        let model = contract.find_model(model_name)?;
        Ok(self.compile(model, table))
    }

    /// Expands the declarations of a single column.
    pub fn compile_column(&self, model: &str, column: &Column) -> Vec<CheckExpression> {
        let mut checks = Vec::new();
        for test in &column.tests {
            match TestKind::of(test) {
                Some(kind) => checks.extend(kind.expand(&column.name, test)),
                None => debug!(
                    model,
                    column = %column.name,
                    kind = test.kind(),
                    "skipping unsupported test"
                ),
            }
        }
        checks
    }

    /// Lists the declarations of a model that compile to nothing.
    pub fn skipped_tests(&self, model: &Model) -> Vec<SkippedTest> {
        model
            .columns
            .iter()
            .flat_map(|column| {
                column
                    .tests
                    .iter()
                    .filter(|test| TestKind::of(test).is_none())
                    .map(|test| SkippedTest {
                        column: column.name.clone(),
                        kind: test.kind().to_string(),
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checks_core::{ColumnBuilder, ModelBuilder, TestDeclaration};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_model_has_row_count_only() {
        let model = ModelBuilder::new("empty").build();
        let group = CheckCompiler::new().compile(&model, "t");
        assert_eq!(group.checks, vec![CheckCompiler::row_count_check()]);
    }

    #[test]
    fn test_duplicate_declarations_are_not_collapsed() {
        let model = ModelBuilder::new("m")
            .column(ColumnBuilder::new("id").not_null().not_null().build())
            .build();
        let group = CheckCompiler::new().compile(&model, "t");

        assert_eq!(group.len(), 3);
        assert_eq!(group.checks[1], group.checks[2]);
    }

    #[test]
    fn test_skipped_tests() {
        let model = ModelBuilder::new("m")
            .column(
                ColumnBuilder::new("id")
                    .not_null()
                    .test(TestDeclaration::bare("relationships"))
                    .build(),
            )
            .build();

        let skipped = CheckCompiler::new().skipped_tests(&model);
        assert_eq!(
            skipped,
            vec![SkippedTest {
                column: "id".to_string(),
                kind: "relationships".to_string(),
            }]
        );
    }
}
