//! fpi-client: typed HTTP client for the Fake Product Identification backend.
//!
//! The backend does all the real work (authentication, registration,
//! IPFS pinning, chain writes, hash verification); this crate is the
//! client side of that protocol:
//!
//! - [`HttpApi`] — one method per backend endpoint, errors mapped to
//!   the [`ApiError`] taxonomy with backend messages surfaced verbatim;
//! - [`ScanBackend`] — the trait seam for the anonymous scan check, so
//!   callers can be driven by a mock in tests;
//! - [`SessionStore`] — explicit login/logout lifecycle with
//!   publish/subscribe change notification (no ambient globals, no
//!   storage polling);
//! - [`ScanAttempt`] — the per-attempt Idle/Submitting/terminal guard
//!   that keeps a view from double-submitting one reference.

pub mod attempt;
pub mod backend;
pub mod error;
pub mod http;
pub mod session;

pub use attempt::{AttemptError, AttemptState, ScanAttempt};
pub use backend::ScanBackend;
pub use error::ApiError;
pub use http::{AuditDecision, HttpApi, Product, RegisterProductRequest, DEFAULT_BASE_URL};
pub use session::{Session, SessionEvent, SessionStore, SessionUser};
