//! fpi-protocol: wire types for the Fake Product Identification backend.
//!
//! Provides the [`ProductReference`] carried by product QR codes, the
//! [`payload`] encode/decode functions for the two payload conventions
//! in circulation (inline JSON and scan-page URL), and the
//! [`ScanVerdict`]/[`ScanOutcome`] types returned by the backend's
//! authenticity check.
//!
//! This crate performs no hashing and no network I/O. Backend responses
//! are validated for shape at the boundary and otherwise passed through
//! untouched — the authenticity determination is owned entirely by the
//! backend.

pub mod display;
pub mod payload;
pub mod reference;
pub mod verdict;

pub use payload::PayloadError;
pub use reference::ProductReference;
pub use verdict::{ScanOutcome, ScanVerdict, VerdictError};
