//! Shape validation for the review API's response envelope.
//!
//! The payload is untrusted third-party input. This stage only
//! guarantees the envelope contract: a JSON object holding the work-item
//! list and the cursor. Item-level fields are the interpreter's
//! contract, checked separately.

use serde_json::Value;

use crate::error::WatchError;

const HOMEWORKS_KEY: &str = "homeworks";
const CURSOR_KEY: &str = "current_date";

/// A validated response: the review items plus the cursor bounding the
/// next fetch window.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub homeworks: Vec<Value>,
    pub current_date: i64,
}

/// Validate a decoded payload against the envelope contract.
///
/// Failures name the offending key so the resulting notification tells
/// the operator what the API actually sent.
pub fn validate(payload: &Value) -> Result<Envelope, WatchError> {
    let object = payload.as_object().ok_or_else(|| {
        WatchError::Schema(format!("expected an object, got {}", type_name(payload)))
    })?;

    let homeworks = object
        .get(HOMEWORKS_KEY)
        .ok_or_else(|| WatchError::Schema(format!("missing key \"{HOMEWORKS_KEY}\"")))?;
    let homeworks = homeworks.as_array().ok_or_else(|| {
        WatchError::Schema(format!(
            "\"{HOMEWORKS_KEY}\" is {}, expected a list",
            type_name(homeworks)
        ))
    })?;

    let cursor = object
        .get(CURSOR_KEY)
        .ok_or_else(|| WatchError::Schema(format!("missing key \"{CURSOR_KEY}\"")))?;
    let current_date = cursor.as_i64().ok_or_else(|| {
        WatchError::Schema(format!(
            "\"{CURSOR_KEY}\" is {}, expected an integer",
            type_name(cursor)
        ))
    })?;

    Ok(Envelope {
        homeworks: homeworks.clone(),
        current_date,
    })
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
