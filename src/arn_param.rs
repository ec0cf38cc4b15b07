//! Base64url encode/decode helpers for ARN path parameters (spec.md §6).
//! An HTTP layer built on top of this crate would use these to carry an
//! ARN (which itself contains `:` and `/`) as a single URL path segment;
//! this crate only provides the pure encode/decode functions.

use {base64::URL_SAFE_NO_PAD, crate::EvalError};

/// Encode an ARN as a base64url (no padding) string.
pub fn encode(arn: &str) -> String {
    base64::encode_config(arn, URL_SAFE_NO_PAD)
}

/// Decode a base64url (no padding) string back into an ARN.
pub fn decode(encoded: &str) -> Result<String, EvalError> {
    let bytes = base64::decode_config(encoded, URL_SAFE_NO_PAD)
        .map_err(|e| EvalError::BadInput(format!("invalid ARN path parameter: {e}")))?;
    String::from_utf8(bytes).map_err(|e| EvalError::BadInput(format!("invalid ARN path parameter: {e}")))
}
