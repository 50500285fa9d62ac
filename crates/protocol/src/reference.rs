//! The product identity carried by a QR code.

use serde::{Deserialize, Serialize};

use crate::payload::PayloadError;

/// A reference to a product and its current lifecycle state.
///
/// Created by the backend at registration; a new instance (same
/// `product_id`, fresh `state_hash`) is issued on every ownership
/// transfer, at which point the previous hash becomes stale. The client
/// never derives either field itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductReference {
    /// Opaque identifier assigned at registration.
    #[serde(rename = "productId")]
    pub product_id: String,
    /// Hex-encoded digest of the product's current lifecycle state.
    #[serde(rename = "stateHash")]
    pub state_hash: String,
}

impl ProductReference {
    /// Build a reference, trimming both fields and rejecting empty ones.
    pub fn new(
        product_id: impl Into<String>,
        state_hash: impl Into<String>,
    ) -> Result<Self, PayloadError> {
        let product_id: String = product_id.into();
        let product_id = product_id.trim().to_string();
        if product_id.is_empty() {
            return Err(PayloadError::EmptyField { field: "productId" });
        }

        let state_hash: String = state_hash.into();
        let state_hash = state_hash.trim().to_string();
        if state_hash.is_empty() {
            return Err(PayloadError::EmptyField { field: "stateHash" });
        }

        Ok(ProductReference {
            product_id,
            state_hash,
        })
    }

    /// True if both fields are non-empty after trimming.
    ///
    /// A reference built through [`ProductReference::new`] always passes;
    /// this guards references assembled field-by-field.
    pub fn is_valid(&self) -> bool {
        !self.product_id.trim().is_empty() && !self.state_hash.trim().is_empty()
    }
}
