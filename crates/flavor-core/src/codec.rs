//! JSON export and import of flavor configurations.
//!
//! Export is canonical: keys appear in schema declaration order and the
//! document is indented with two spaces, so two exports of equal
//! configurations are byte-identical and diff cleanly.
//!
//! Import only parses.  The returned [`ConfigPatch`] still has to go through
//! the validation routine before anything is stored.

use serde_json::Value;
use thiserror::Error;

use crate::domain::config::FlavorConfig;
use crate::domain::patch::ConfigPatch;

/// Errors produced by the JSON codec.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The text is not valid JSON.
    #[error("malformed configuration JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The JSON is valid but its top level is not an object.
    #[error("configuration JSON must be an object, found {0}")]
    NotAnObject(&'static str),
}

/// Serializes `config` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] if serialization fails, which cannot
/// happen for the schema types but is surfaced rather than hidden.
pub fn export_json(config: &FlavorConfig) -> Result<String, CodecError> {
    Ok(serde_json::to_string_pretty(config)?)
}

/// Parses exported (or hand-written) JSON into a patch.
///
/// # Errors
///
/// Returns [`CodecError::Malformed`] for invalid JSON and
/// [`CodecError::NotAnObject`] when the top level is a scalar or array.
pub fn parse_import(text: &str) -> Result<ConfigPatch, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    if !value.is_object() {
        return Err(CodecError::NotAnObject(json_kind(&value)));
    }
    Ok(ConfigPatch::from_value(&value))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
