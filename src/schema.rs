//! Extraction schema: the caller-supplied JSON Schema describing the
//! fields to pull out of a form.
//!
//! The schema object is accepted at the top level, exactly as sent.
//! Earlier revisions of the upload contract nested it under
//! `definitions.FormSchema` (the shape `zod-to-json-schema` produces with
//! a named root); that nesting is no longer unwrapped. Callers using the
//! old convention must send `schema.definitions.FormSchema` themselves.

use crate::error::ExtractError;
use serde_json::{Map, Value};

/// A JSON-Schema-shaped description of the expected extraction output.
///
/// No validation beyond "is a JSON object" is performed; the schema is
/// forwarded verbatim as the extraction tool's `input_schema`, and the
/// model endpoint enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionSchema(Map<String, Value>);

impl ExtractionSchema {
    /// Parse schema text into a schema object.
    ///
    /// Fails with [`ExtractError::SchemaInvalid`] when the text is not
    /// valid JSON or the top-level value is not an object.
    pub fn parse(text: &str) -> Result<Self, ExtractError> {
        let value: Value = serde_json::from_str(text).map_err(|e| ExtractError::SchemaInvalid {
            detail: e.to_string(),
        })?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ExtractError::SchemaInvalid {
                detail: format!("expected a JSON object, got {}", json_type_name(&other)),
            }),
        }
    }

    /// The schema as a JSON object, for embedding in a tool definition.
    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Names declared under the schema's `properties` key.
    ///
    /// Used at the boundary to sanity-check that extraction results only
    /// contain declared fields. An absent or non-object `properties`
    /// yields an empty list.
    pub fn property_names(&self) -> Vec<&str> {
        self.0
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

impl From<ExtractionSchema> for Value {
    fn from(schema: ExtractionSchema) -> Self {
        Value::Object(schema.0)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
