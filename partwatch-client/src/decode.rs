//! Tolerant decoding of per-part error responses.
//!
//! The error-list endpoints have accumulated several response shapes over
//! backend revisions: a plain array of code strings, an `{"error": …}`
//! object, and occasionally something else entirely. Rather than guessing
//! at call sites, everything funnels through [`decode_error_codes`], which
//! yields an explicit success-or-reason result.

use serde_json::Value;

/// Result of decoding a per-part error response: the list of codes, or a
/// displayable reason why the payload was unusable.
pub type DecodeOutcome = Result<Vec<String>, String>;

/// Decode a per-part error payload into a list of error codes.
///
/// Accepted shapes:
/// - an array: string elements are taken as codes, non-string elements are
///   stringified so nothing is silently dropped
/// - an object with an `error` field: treated as a backend-reported failure
/// - anything else: rejected with the stringified payload as the reason
pub fn decode_error_codes(payload: &Value) -> DecodeOutcome {
    match payload {
        Value::Array(items) => Ok(items.iter().map(display_code).collect()),
        Value::Object(map) => match map.get("error") {
            Some(reason) => Err(display_code(reason)),
            None => Err(format!("unexpected object payload: {payload}")),
        },
        other => Err(format!("unexpected payload: {other}")),
    }
}

fn display_code(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
