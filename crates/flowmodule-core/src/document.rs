//! Insertion-ordered JSON documents
//!
//! Flow modules are diffed against known-good templates, so key order must
//! survive a parse/serialise round trip. `serde_json` is built with
//! `preserve_order`, which keeps insertion order in [`Map`]: overwriting a key
//! keeps its slot, new keys are appended.

use serde_json::{Map, Value};

use crate::error::{Result, TransformError};

/// A parsed JSON object with stable key order
pub type OrderedDocument = Map<String, Value>;

/// Parse a flow module template. The top level must be a JSON object.
pub fn parse_document(json: &str) -> Result<OrderedDocument> {
    let value: Value = serde_json::from_str(json)
        .map_err(|e| TransformError::invalid_document(format!("failed to parse JSON: {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(TransformError::invalid_document(format!(
            "top level must be an object, found {}",
            type_name(&other)
        ))),
    }
}

/// Serialise with the two-space indentation Connect templates use
pub fn to_pretty_json(doc: &OrderedDocument) -> Result<String> {
    serde_json::to_string_pretty(doc)
        .map_err(|e| TransformError::invalid_document(format!("failed to serialise JSON: {}", e)))
}

/// JSON type name for error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Append `segment` to a JSON-pointer style path
pub(crate) fn child_path(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, segment)
}

/// Fetch `field` of `map` as a mutable object, failing on absence or wrong shape
pub(crate) fn object_field_mut<'a>(
    map: &'a mut OrderedDocument,
    field: &str,
    path: &str,
) -> Result<&'a mut OrderedDocument> {
    match map.get_mut(field) {
        Some(Value::Object(inner)) => Ok(inner),
        Some(other) => Err(TransformError::unexpected_type(
            path,
            field,
            "an object",
            type_name(other),
        )),
        None => Err(TransformError::missing_field(path, field)),
    }
}

/// Fetch the top-level `Actions` array. `Ok(None)` when the key is absent.
pub(crate) fn actions_mut(doc: &mut OrderedDocument) -> Result<Option<&mut Vec<Value>>> {
    match doc.get_mut(crate::field_names::ACTIONS) {
        None => Ok(None),
        Some(Value::Array(actions)) => Ok(Some(actions)),
        Some(other) => Err(TransformError::unexpected_type(
            "",
            crate::field_names::ACTIONS,
            "an array",
            type_name(other),
        )),
    }
}
