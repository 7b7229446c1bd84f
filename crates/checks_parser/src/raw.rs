//! Document-level contract layout.
//!
//! Test declarations are kept as untyped values here so that a malformed
//! declaration can be reported with its model and column instead of as a
//! generic deserialization failure. Such failures are scoped to their model:
//! the rest of the document still loads.

use checks_core::{Column, Contract, ContractError, Model, TestDeclaration};
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_yaml_ng::Value as RawValue;
use tracing::warn;

#[derive(Debug, Deserialize)]
pub(crate) struct RawDocument {
    #[serde(default)]
    models: Vec<RawModel>,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    tests: Option<Vec<RawValue>>,
    #[serde(default)]
    data_tests: Option<Vec<RawValue>>,
}

impl RawDocument {
    /// Resolves every model, setting aside the ones that cannot be resolved.
    ///
    /// A rejected model is recorded only when no earlier model of the same
    /// name exists, so lookups keep first-declaration-wins semantics.
    pub(crate) fn resolve(self) -> Contract {
        let mut models: Vec<Model> = Vec::with_capacity(self.models.len());
        let mut rejected: Vec<ContractError> = Vec::new();

        for raw in self.models {
            let name = raw.name.clone();
            match raw.resolve() {
                Ok(model) => models.push(model),
                Err(err) => {
                    let shadowed = models.iter().any(|m| m.name == name)
                        || rejected.iter().any(|e| e.model() == Some(name.as_str()));
                    warn!(model = %name, "{}", err);
                    if !shadowed {
                        rejected.push(err);
                    }
                }
            }
        }

        Contract::with_rejected(models, rejected)
    }
}

impl RawModel {
    fn resolve(self) -> Result<Model, ContractError> {
        let mut columns = Vec::with_capacity(self.columns.len());
        for raw in self.columns {
            let declared = match (raw.tests, raw.data_tests) {
                (Some(_), Some(_)) => {
                    return Err(ContractError::ConflictingTestLists {
                        model: self.name,
                        column: raw.name,
                    });
                }
                (Some(tests), None) | (None, Some(tests)) => tests,
                (None, None) => Vec::new(),
            };

            let mut tests = Vec::with_capacity(declared.len());
            for (index, value) in declared.into_iter().enumerate() {
                let test = to_json(value)
                    .and_then(|value| TestDeclaration::from_value(&value))
                    .map_err(|reason| {
                        ContractError::malformed(&self.name, &raw.name, index + 1, reason)
                    })?;
                tests.push(test);
            }
            columns.push(Column {
                name: raw.name,
                description: raw.description,
                tests,
            });
        }

        Ok(Model {
            name: self.name,
            description: self.description,
            columns,
        })
    }
}

/// Converts a document value into a JSON value.
///
/// Non-finite floats (`.inf`, `-.inf`, `.nan`) have no JSON number form and
/// are carried as their literal spelling (`inf`, `-inf`, `nan`).
fn to_json(value: RawValue) -> Result<Value, String> {
    Ok(match value {
        RawValue::Null => Value::Null,
        RawValue::Bool(flag) => Value::Bool(flag),
        RawValue::Number(number) => number_to_json(&number),
        RawValue::String(text) => Value::String(text),
        RawValue::Sequence(items) => {
            Value::Array(items.into_iter().map(to_json).collect::<Result<_, _>>()?)
        }
        RawValue::Mapping(entries) => {
            let mut map = Map::new();
            for (key, value) in entries {
                map.insert(key_to_string(key)?, to_json(value)?);
            }
            Value::Object(map)
        }
        RawValue::Tagged(tagged) => to_json(tagged.value)?,
    })
}

fn number_to_json(number: &serde_yaml_ng::Number) -> Value {
    if let Some(int) = number.as_i64() {
        return Value::from(int);
    }
    if let Some(uint) = number.as_u64() {
        return Value::from(uint);
    }
    match number.as_f64() {
        Some(float) if float.is_finite() => Value::from(float),
        Some(float) if float.is_nan() => Value::String("nan".to_string()),
        Some(float) if float.is_sign_negative() => Value::String("-inf".to_string()),
        Some(_) => Value::String("inf".to_string()),
        None => Value::String(number.to_string()),
    }
}

fn key_to_string(key: RawValue) -> Result<String, String> {
    match key {
        RawValue::String(text) => Ok(text),
        RawValue::Number(number) => Ok(number.to_string()),
        RawValue::Bool(flag) => Ok(flag.to_string()),
        RawValue::Tagged(tagged) => key_to_string(tagged.value),
        RawValue::Null => Err("mapping keys must be scalars, found null".to_string()),
        RawValue::Sequence(_) | RawValue::Mapping(_) => {
            Err("mapping keys must be scalars, found a collection".to_string())
        }
    }
}
