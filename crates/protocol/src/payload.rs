//! QR payload encoding and decoding.
//!
//! Two payload conventions exist in the field, produced by different
//! registration flows: a compact inline JSON object and a scan-page URL
//! carrying the same two values as query parameters. Neither flow is
//! authoritative, so encoding treats the JSON form as canonical
//! ([`encode_json`]) while still offering the URL form ([`encode_url`]),
//! and [`decode`] accepts both.

use crate::reference::ProductReference;

/// Errors from payload decoding or reference construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    /// A required field is present but empty after trimming.
    #[error("payload field '{field}' is empty")]
    EmptyField { field: &'static str },

    /// A required field is absent from the payload.
    #[error("payload is missing field '{field}'")]
    MissingField { field: &'static str },

    /// The input is neither an inline JSON payload nor a scan URL.
    #[error("payload is neither inline JSON nor a scan URL")]
    UnrecognizedForm,
}

/// Encode a reference as the canonical inline JSON payload.
///
/// Key order is stable: `productId` first, then `stateHash`. No hashing,
/// no I/O — serialization of two strings cannot fail.
pub fn encode_json(reference: &ProductReference) -> String {
    serde_json::to_string(reference)
        .unwrap_or_else(|e| panic!("serialization error encoding payload: {}", e))
}

/// Encode a reference as an absolute scan-page URL.
///
/// `base` is the scheme-and-host part (a trailing slash is tolerated);
/// query parameter values are percent-encoded.
pub fn encode_url(reference: &ProductReference, base: &str) -> String {
    format!(
        "{}/scan?productId={}&stateHash={}",
        base.trim_end_matches('/'),
        urlencoded(&reference.product_id),
        urlencoded(&reference.state_hash),
    )
}

/// Decode a payload in either supported form.
///
/// Attempts a JSON parse first; on parse failure falls back to
/// extracting query parameters from a URL. Both paths trim field values
/// and reject empty ones. Never panics on malformed input — every
/// failure is an explicit [`PayloadError`].
pub fn decode(raw: &str) -> Result<ProductReference, PayloadError> {
    let trimmed = raw.trim();
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(trimmed) {
        return decode_json_form(&value);
    }
    decode_url_form(trimmed)
}

fn decode_json_form(value: &serde_json::Value) -> Result<ProductReference, PayloadError> {
    let obj = value.as_object().ok_or(PayloadError::UnrecognizedForm)?;
    let product_id = obj
        .get("productId")
        .and_then(|v| v.as_str())
        .ok_or(PayloadError::MissingField { field: "productId" })?;
    let state_hash = obj
        .get("stateHash")
        .and_then(|v| v.as_str())
        .ok_or(PayloadError::MissingField { field: "stateHash" })?;
    ProductReference::new(product_id, state_hash)
}

fn decode_url_form(raw: &str) -> Result<ProductReference, PayloadError> {
    let query = match raw.split_once('?') {
        Some((_, query)) => query,
        None => return Err(PayloadError::UnrecognizedForm),
    };
    // Ignore any fragment a scanner app may have tacked on.
    let query = query.split('#').next().unwrap_or(query);

    let mut product_id: Option<String> = None;
    let mut state_hash: Option<String> = None;

    for pair in query.split('&') {
        let (key, value) = match pair.split_once('=') {
            Some(kv) => kv,
            None => continue,
        };
        let value = percent_decode(value).ok_or(PayloadError::UnrecognizedForm)?;
        match key {
            "productId" => product_id = Some(value),
            "stateHash" => state_hash = Some(value),
            _ => {}
        }
    }

    let product_id = product_id.ok_or(PayloadError::MissingField { field: "productId" })?;
    let state_hash = state_hash.ok_or(PayloadError::MissingField { field: "stateHash" })?;
    ProductReference::new(product_id, state_hash)
}

/// Percent-encode a query parameter or path segment value.
///
/// Only unreserved characters pass through unencoded.
pub fn urlencoded(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '-' | '_' | '.' | '~' => out.push(ch),
            ' ' => out.push_str("%20"),
            _ => {
                for byte in ch.to_string().as_bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    out
}

/// Percent-decode a query parameter value. `+` decodes to a space.
///
/// Returns `None` on truncated escapes, bad hex digits, or invalid UTF-8.
fn percent_decode(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hi = hex_digit(*bytes.get(i + 1)?)?;
                let lo = hex_digit(*bytes.get(i + 2)?)?;
                out.push(hi * 16 + lo);
                i += 3;
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

fn hex_digit(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}
