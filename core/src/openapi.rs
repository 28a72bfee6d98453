//! Parameter extraction from a variant's OpenAPI document.
//!
//! # Design
//! The backend serves one OpenAPI document per variant; the parameters of the
//! generate operation describe the variant's configurable fields. A parameter
//! entry with a `schema.default` is an option (`input == false`); one without
//! is a required input the caller must fill in (`input == true`). Non-string
//! defaults are carried over in their JSON rendering since the wire format is
//! stringly typed.

use serde_json::Value;

use crate::error::ApiError;
use crate::types::Parameter;

/// Extract the parameter descriptors from an OpenAPI document.
///
/// Looks for the POST operation of the `/generate` path, falling back to the
/// first path that has one. A document without any POST operation is
/// malformed from this client's point of view; an operation without a
/// `parameters` array yields an empty list.
pub fn parse_openapi_parameters(document: &Value) -> Result<Vec<Parameter>, ApiError> {
    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| ApiError::DeserializationError("openapi document has no paths".to_string()))?;

    let operation = paths
        .get("/generate")
        .and_then(|path| path.get("post"))
        .or_else(|| paths.values().find_map(|path| path.get("post")))
        .ok_or_else(|| {
            ApiError::DeserializationError("no generate operation in openapi document".to_string())
        })?;

    let Some(entries) = operation.get("parameters").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };

    entries.iter().map(parse_parameter_entry).collect()
}

fn parse_parameter_entry(entry: &Value) -> Result<Parameter, ApiError> {
    let name = entry
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::DeserializationError("parameter entry has no name".to_string()))?;

    let default = entry
        .get("schema")
        .and_then(|schema| schema.get("default"))
        .map(default_as_string);

    Ok(Parameter {
        name: name.to_string(),
        input: default.is_none(),
        default,
    })
}

fn default_as_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
