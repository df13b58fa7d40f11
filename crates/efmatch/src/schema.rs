//! Structural validation of raw, untyped rows.

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;

/// Reason a raw row failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    /// The row is not a field mapping.
    #[error("expected an object, found {0}")]
    NotAnObject(&'static str),

    /// A required field is absent.
    #[error("missing required field '{0}'")]
    MissingField(String),

    /// A required field holds something other than a string.
    #[error("field '{field}' must be a string, found {found}")]
    NotAString { field: String, found: &'static str },
}

/// Validate `raw` against the required fields.
///
/// Returns the row restricted to `required`, in the order given there.
/// Fields not listed are dropped without complaint.
pub fn validate(
    raw: &Value,
    required: &[String],
) -> Result<IndexMap<String, String>, SchemaViolation> {
    let object = raw
        .as_object()
        .ok_or_else(|| SchemaViolation::NotAnObject(kind_of(raw)))?;

    let mut record = IndexMap::with_capacity(required.len());
    for field in required {
        match object.get(field) {
            None => return Err(SchemaViolation::MissingField(field.clone())),
            Some(Value::String(s)) => {
                record.insert(field.clone(), s.clone());
            }
            Some(other) => {
                return Err(SchemaViolation::NotAString {
                    field: field.clone(),
                    found: kind_of(other),
                });
            }
        }
    }

    Ok(record)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
