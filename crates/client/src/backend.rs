//! Trait seam for the scan check.
//!
//! Views and the CLI depend on [`ScanBackend`] rather than on the HTTP
//! client directly, so tests can drive them with a canned verdict.

use async_trait::async_trait;

use fpi_protocol::{ProductReference, ScanOutcome};

use crate::error::ApiError;

/// Anything that can answer "is this product reference authentic?".
///
/// Implementations must not reinterpret the backend's verdict; they
/// return it as received.
#[async_trait]
pub trait ScanBackend: Send + Sync {
    /// Submit a reference for verification.
    ///
    /// Fails fast with [`ApiError::Validation`] when either field is
    /// empty after trimming — no request is attempted.
    async fn submit_scan(&self, reference: &ProductReference) -> Result<ScanOutcome, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct FixedVerdict {
        authentic: bool,
    }

    #[async_trait]
    impl ScanBackend for FixedVerdict {
        async fn submit_scan(
            &self,
            reference: &ProductReference,
        ) -> Result<ScanOutcome, ApiError> {
            if !reference.is_valid() {
                return Err(ApiError::validation("productId and stateHash are required"));
            }
            Ok(ScanOutcome::from_response(&json!({
                "verdict": {
                    "isAuthentic": self.authentic,
                    "isLatestDbState": self.authentic,
                    "dbCloudHashMatches": self.authentic,
                    "chainCloudHashMatches": self.authentic,
                    "message": if self.authentic { "ok" } else { "hash mismatch" }
                }
            }))
            .expect("fixed verdict is well-formed"))
        }
    }

    #[tokio::test]
    async fn mock_backend_round_trip() {
        let backend = FixedVerdict { authentic: false };
        let reference = ProductReference::new("P2001", "abc123").unwrap();
        let outcome = backend.submit_scan(&reference).await.unwrap();
        assert!(!outcome.verdict.is_authentic);
        assert_eq!(outcome.verdict.message, "hash mismatch");
    }

    #[tokio::test]
    async fn mock_backend_rejects_blank_reference() {
        let backend = FixedVerdict { authentic: true };
        let reference = ProductReference {
            product_id: " ".to_string(),
            state_hash: "abc".to_string(),
        };
        let err = backend.submit_scan(&reference).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { .. }));
    }
}
