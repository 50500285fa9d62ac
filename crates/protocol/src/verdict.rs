//! Scan verdicts and boundary validation of the backend's scan response.
//!
//! The backend owns the authenticity contract (`isAuthentic` is true only
//! when all three sub-checks pass). This module validates the *shape* of
//! a response before handing it to callers; it never recomputes or
//! second-guesses the verdict itself, and a self-inconsistent verdict is
//! passed through as-is.

use serde::{Deserialize, Serialize};

/// The backend's structured authenticity determination for one scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanVerdict {
    /// Overall pass/fail.
    #[serde(rename = "isAuthentic")]
    pub is_authentic: bool,
    /// Whether the submitted state hash equals the currently stored one.
    /// `false` detects replay of a QR from before a transfer.
    #[serde(rename = "isLatestDbState")]
    pub is_latest_db_state: bool,
    /// Whether the recomputed cloud-data hash matches the primary datastore.
    #[serde(rename = "dbCloudHashMatches")]
    pub db_cloud_hash_matches: bool,
    /// Whether the recomputed cloud-data hash matches the ledger record.
    #[serde(rename = "chainCloudHashMatches")]
    pub chain_cloud_hash_matches: bool,
    /// Human-readable explanation.
    #[serde(default)]
    pub message: String,
}

/// The full scan response: the verdict plus backend-owned context records.
///
/// `product`, `chain`, and `events` are historical/context data whose
/// shapes belong to the backend; they are carried as raw JSON for the
/// caller to render, never interpreted here.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    pub verdict: ScanVerdict,
    pub product: Option<serde_json::Value>,
    pub chain: Option<serde_json::Value>,
    pub events: Option<serde_json::Value>,
}

/// Errors from scan-response shape validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerdictError {
    /// The response is missing a required field.
    #[error("scan response missing required field '{field}'")]
    MissingField { field: &'static str },
    /// A verdict field is present but has the wrong type.
    #[error("scan verdict field '{field}' has the wrong type")]
    InvalidField { field: &'static str },
    /// The response body is not a JSON object.
    #[error("scan response is not a JSON object")]
    NotAnObject,
}

impl ScanOutcome {
    /// Validate a 2xx scan-response body.
    ///
    /// Requires a well-formed `verdict` object; everything else is
    /// optional pass-through.
    pub fn from_response(body: &serde_json::Value) -> Result<Self, VerdictError> {
        let obj = body.as_object().ok_or(VerdictError::NotAnObject)?;
        let verdict_value = obj
            .get("verdict")
            .ok_or(VerdictError::MissingField { field: "verdict" })?;
        let verdict = parse_verdict(verdict_value)?;

        Ok(ScanOutcome {
            verdict,
            product: obj.get("product").cloned(),
            chain: obj.get("chain").cloned(),
            events: obj.get("events").cloned(),
        })
    }
}

fn parse_verdict(value: &serde_json::Value) -> Result<ScanVerdict, VerdictError> {
    let obj = value
        .as_object()
        .ok_or(VerdictError::InvalidField { field: "verdict" })?;

    let message = obj
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or("")
        .to_string();

    Ok(ScanVerdict {
        is_authentic: required_bool(obj, "isAuthentic")?,
        is_latest_db_state: required_bool(obj, "isLatestDbState")?,
        db_cloud_hash_matches: required_bool(obj, "dbCloudHashMatches")?,
        chain_cloud_hash_matches: required_bool(obj, "chainCloudHashMatches")?,
        message,
    })
}

fn required_bool(
    obj: &serde_json::Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<bool, VerdictError> {
    match obj.get(field) {
        None => Err(VerdictError::MissingField { field }),
        Some(v) => v.as_bool().ok_or(VerdictError::InvalidField { field }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok_body() -> serde_json::Value {
        json!({
            "verdict": {
                "isAuthentic": true,
                "isLatestDbState": true,
                "dbCloudHashMatches": true,
                "chainCloudHashMatches": true,
                "message": "ok"
            },
            "product": {"product_code": "P2001"},
            "events": [{"kind": "REGISTERED"}]
        })
    }

    #[test]
    fn parses_full_response() {
        let outcome = ScanOutcome::from_response(&ok_body()).unwrap();
        assert!(outcome.verdict.is_authentic);
        assert_eq!(outcome.verdict.message, "ok");
        assert_eq!(outcome.product.unwrap()["product_code"], "P2001");
        assert!(outcome.chain.is_none());
        assert!(outcome.events.is_some());
    }

    #[test]
    fn missing_verdict_is_rejected() {
        let err = ScanOutcome::from_response(&json!({"product": {}})).unwrap_err();
        assert_eq!(err, VerdictError::MissingField { field: "verdict" });
    }

    #[test]
    fn missing_sub_check_is_rejected() {
        let body = json!({"verdict": {"isAuthentic": true, "message": "x"}});
        let err = ScanOutcome::from_response(&body).unwrap_err();
        assert_eq!(
            err,
            VerdictError::MissingField {
                field: "isLatestDbState"
            }
        );
    }

    #[test]
    fn wrong_typed_sub_check_is_rejected() {
        let mut body = ok_body();
        body["verdict"]["dbCloudHashMatches"] = json!("yes");
        let err = ScanOutcome::from_response(&body).unwrap_err();
        assert_eq!(
            err,
            VerdictError::InvalidField {
                field: "dbCloudHashMatches"
            }
        );
    }

    #[test]
    fn missing_message_defaults_to_empty() {
        let mut body = ok_body();
        body["verdict"].as_object_mut().unwrap().remove("message");
        let outcome = ScanOutcome::from_response(&body).unwrap();
        assert_eq!(outcome.verdict.message, "");
    }

    #[test]
    fn inconsistent_verdict_is_passed_through() {
        // isAuthentic=true with a failing sub-check is the backend's
        // problem to explain; the client renders it verbatim.
        let body = json!({
            "verdict": {
                "isAuthentic": true,
                "isLatestDbState": false,
                "dbCloudHashMatches": true,
                "chainCloudHashMatches": true,
                "message": "odd"
            }
        });
        let outcome = ScanOutcome::from_response(&body).unwrap();
        assert!(outcome.verdict.is_authentic);
        assert!(!outcome.verdict.is_latest_db_state);
    }

    #[test]
    fn non_object_body_is_rejected() {
        let err = ScanOutcome::from_response(&json!([1, 2])).unwrap_err();
        assert_eq!(err, VerdictError::NotAnObject);
    }

    #[test]
    fn verdict_serde_round_trip_uses_wire_names() {
        let verdict = ScanVerdict {
            is_authentic: false,
            is_latest_db_state: false,
            db_cloud_hash_matches: true,
            chain_cloud_hash_matches: false,
            message: "state hash is stale".to_string(),
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["isAuthentic"], false);
        assert_eq!(json["chainCloudHashMatches"], false);
        let back: ScanVerdict = serde_json::from_value(json).unwrap();
        assert_eq!(back, verdict);
    }
}
