//! # Response Envelope
//!
//! Every reply from the control server is a JSON object carrying at least a
//! `callback` field that names the handler the reply is meant for. The stock
//! server additionally sets `error` (whether the script call threw) and
//! `return` (the script engine's return values); any further fields are
//! opaque and forwarded to the handler untouched.

use crate::error::EnvelopeError;
use serde_json::{Map, Value};

/// A decoded response envelope.
///
/// The full decoded object is retained, `callback` included, so a handler
/// always sees exactly what the server sent.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    callback: String,
    fields: Map<String, Value>,
}

impl ApiResponse {
    /// The handler name this response is addressed to.
    pub fn callback(&self) -> &str {
        &self.callback
    }

    /// The complete decoded response object.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// A single field of the response object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Whether the server flagged the remote call as failed. A missing
    /// `error` field counts as success.
    pub fn is_error(&self) -> bool {
        self.fields
            .get("error")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The script engine's return values, empty when the server sent none.
    pub fn return_values(&self) -> &[Value] {
        self.fields
            .get("return")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Re-serializes the decoded object, primarily for diagnostics.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_default()
    }
}

/// Decodes a raw response body into an [`ApiResponse`].
///
/// The body must be a JSON object with a string-valued `callback` field;
/// anything else is a malformed envelope and dispatch for this response is
/// aborted.
pub fn try_parse_body(body: &str) -> Result<ApiResponse, EnvelopeError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Object(fields) = value else {
        return Err(EnvelopeError::NotAnObject);
    };
    let callback = match fields.get("callback") {
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err(EnvelopeError::CallbackNotAString),
        None => return Err(EnvelopeError::MissingCallback),
    };
    Ok(ApiResponse { callback, fields })
}
