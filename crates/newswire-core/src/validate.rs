// newswire-core/src/validate.rs
// ============================================================================
// Module: Argument Validation
// Description: Schema-compiled validation of raw tool arguments.
// Purpose: Reject invalid tool calls before any upstream request is built.
// Dependencies: jsonschema, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The registry compiles one JSON Schema validator per tool from the
//! catalog's generated schemas and turns raw JSON arguments into
//! [`ValidatedArguments`]: typed, bound-checked values with declared defaults
//! filled in. Validation halts on the first violated constraint and reports
//! the offending field, the constraint, and the received value.
//!
//! Security posture: tool arguments are untrusted input; validation fails
//! closed on anything the schema does not explicitly accept.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::ParamKind;
use crate::catalog::ParamSpec;
use crate::catalog::ToolDefinition;
use crate::catalog::ToolSpec;
use crate::catalog::catalog;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Argument validation error.
///
/// # Invariants
/// - Messages identify the offending field and the violated constraint.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Invalid argument payload or constraint violation.
    #[error("{0}")]
    Invalid(String),
    /// A generated tool schema failed to compile.
    #[error("invalid tool schema: {0}")]
    Schema(String),
}

// ============================================================================
// SECTION: Validated Values
// ============================================================================

/// A single validated parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// Validated string value.
    String(String),
    /// Validated integer value.
    Integer(i64),
    /// Validated floating-point value.
    Number(f64),
    /// Validated boolean value.
    Boolean(bool),
}

impl ParamValue {
    /// Renders the value in upstream query-parameter form.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::String(value) => value.clone(),
            Self::Integer(value) => value.to_string(),
            Self::Number(value) => value.to_string(),
            Self::Boolean(value) => value.to_string(),
        }
    }

    /// Returns true when the value renders to an empty query parameter.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::String(value) if value.is_empty())
    }
}

/// Validated, defaulted tool arguments in catalog order.
///
/// # Invariants
/// - Keys are catalog parameter names with their exact wire casing.
/// - Exists only for the duration of a single dispatch call.
#[derive(Debug, Clone, Default)]
pub struct ValidatedArguments {
    /// Ordered `(name, value)` pairs.
    values: Vec<(&'static str, ParamValue)>,
}

impl ValidatedArguments {
    /// Builds validated arguments from pre-checked pairs.
    #[must_use]
    pub const fn new(values: Vec<(&'static str, ParamValue)>) -> Self {
        Self {
            values,
        }
    }

    /// Iterates the validated pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ParamValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    /// Looks up a validated value by parameter name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.iter().find(|(key, _)| *key == name).map(|(_, value)| value)
    }

    /// Returns the number of validated parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no parameters were provided.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// A catalog entry paired with its compiled validator.
pub struct RegistryEntry {
    /// Tool declaration backing this entry.
    spec: ToolSpec,
    /// Generated wire schema for advertisement.
    schema: Value,
    /// Compiled validator derived from the same schema.
    validator: Validator,
}

impl RegistryEntry {
    /// Returns the tool declaration.
    #[must_use]
    pub const fn spec(&self) -> &ToolSpec {
        &self.spec
    }

    /// Returns the generated wire schema.
    #[must_use]
    pub const fn schema(&self) -> &Value {
        &self.schema
    }

    /// Validates raw arguments against the tool schema.
    ///
    /// Absent optional parameters with declared defaults are filled in.
    /// Unknown fields are ignored. A `null` payload is treated as an empty
    /// argument object.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] identifying the first violated constraint.
    pub fn validate(&self, raw: &Value) -> Result<ValidatedArguments, ValidationError> {
        let empty = Value::Object(Map::new());
        let payload = if raw.is_null() { &empty } else { raw };
        let Value::Object(fields) = payload else {
            return Err(ValidationError::Invalid(format!(
                "tool {} arguments must be a JSON object",
                self.spec.name
            )));
        };
        if let Some(error) = self.validator.iter_errors(payload).next() {
            return Err(first_violation(&self.spec, &error));
        }
        let mut values = Vec::with_capacity(self.spec.params.len());
        for param in &self.spec.params {
            match fields.get(param.name) {
                Some(value) => values.push((param.name, coerce(param, value)?)),
                None => {
                    if let Some(default) = &param.default {
                        values.push((param.name, coerce(param, default)?));
                    }
                }
            }
        }
        Ok(ValidatedArguments::new(values))
    }
}

/// Immutable tool registry mapping names to validators and bindings.
///
/// # Invariants
/// - Built once at startup; read-only afterwards, safe to share across
///   concurrent requests without locking.
pub struct ToolRegistry {
    /// Entries in canonical catalog order.
    entries: Vec<RegistryEntry>,
    /// Name lookup into `entries`.
    index: BTreeMap<&'static str, usize>,
}

impl ToolRegistry {
    /// Builds the registry, compiling one validator per catalog entry.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Schema`] when a generated schema fails to
    /// compile; this is a startup defect, not a request-time condition.
    pub fn new() -> Result<Self, ValidationError> {
        let mut entries = Vec::new();
        let mut index = BTreeMap::new();
        for spec in catalog() {
            let schema = spec.input_schema();
            let validator = compile_schema(&schema)?;
            index.insert(spec.name.as_str(), entries.len());
            entries.push(RegistryEntry {
                spec,
                schema,
                validator,
            });
        }
        Ok(Self {
            entries,
            index,
        })
    }

    /// Looks up a registry entry by tool name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegistryEntry> {
        self.index.get(name).map(|position| &self.entries[*position])
    }

    /// Iterates entries in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.iter()
    }

    /// Returns the wire-visible tool definitions in catalog order.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.entries
            .iter()
            .map(|entry| ToolDefinition {
                name: entry.spec.name,
                description: entry.spec.description.to_string(),
                input_schema: entry.schema.clone(),
            })
            .collect()
    }

    /// Returns the number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Compiles a generated tool schema for validation.
fn compile_schema(schema: &Value) -> Result<Validator, ValidationError> {
    jsonschema::options()
        .with_draft(Draft::Draft202012)
        .build(schema)
        .map_err(|err| ValidationError::Schema(err.to_string()))
}

/// Formats the first schema violation with field, constraint, and value.
fn first_violation(spec: &ToolSpec, error: &jsonschema::ValidationError<'_>) -> ValidationError {
    let path = error.instance_path().to_string();
    if path.is_empty() {
        ValidationError::Invalid(format!("tool {}: {error}", spec.name))
    } else {
        ValidationError::Invalid(format!("tool {} parameter `{path}`: {error}", spec.name))
    }
}

/// Coerces a schema-accepted JSON value into its typed parameter value.
fn coerce(param: &ParamSpec, value: &Value) -> Result<ParamValue, ValidationError> {
    let coerced = match param.kind {
        ParamKind::String => value.as_str().map(|text| ParamValue::String(text.to_string())),
        ParamKind::Integer => value.as_i64().map(ParamValue::Integer),
        ParamKind::Number => value.as_f64().map(ParamValue::Number),
        ParamKind::Boolean => value.as_bool().map(ParamValue::Boolean),
    };
    coerced.ok_or_else(|| {
        ValidationError::Invalid(format!(
            "parameter `{}`: expected {}, received {value}",
            param.name,
            param.kind.schema_type()
        ))
    })
}
