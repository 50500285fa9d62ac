//! HTTP client for the FPI backend API.
//!
//! One method per endpoint, all JSON. Uses `ureq` (sync) wrapped in
//! `tokio::task::spawn_blocking` so async callers never block the
//! runtime. Non-2xx responses are turned into [`ApiError::Request`] with
//! the backend's own `message`/`error` strings; nothing is retried.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use fpi_protocol::payload::urlencoded;
use fpi_protocol::{ProductReference, ScanOutcome};

use crate::backend::ScanBackend;
use crate::error::ApiError;
use crate::session::{Session, SessionStore, SessionUser};

/// Deployed backend used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://fake-product-identification-backend.vercel.app";

/// Explicit request timeout. The transport default is no timeout at all,
/// which would leave a scan hanging forever on a dead backend.
const REQUEST_TIMEOUT_SECS: u64 = 15;

// ─── Resource types ───────────────────────────────────────────────────────────

/// A product row from `GET /api/products`.
///
/// Everything beyond the code is optional; `meta_json` stays raw because
/// its shape is backend-owned.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_code: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub batch: Option<String>,
    #[serde(default)]
    pub ipfs_cid: Option<String>,
    #[serde(default)]
    pub cloud_hash: Option<String>,
    #[serde(default)]
    pub current_state_hash: Option<String>,
    #[serde(default)]
    pub nfc_uid_hash: Option<String>,
    #[serde(default)]
    pub audit_status: Option<String>,
    #[serde(default)]
    pub meta_json: Option<serde_json::Value>,
}

impl Product {
    /// `meta_json.brand`, when present and a string.
    pub fn brand(&self) -> Option<&str> {
        self.meta_json.as_ref()?.get("brand")?.as_str()
    }

    /// `meta_json.certificate_sha256`, when present and a string.
    pub fn certificate_sha256(&self) -> Option<&str> {
        self.meta_json.as_ref()?.get("certificate_sha256")?.as_str()
    }

    /// The scannable reference for this row, if it has a state hash.
    pub fn reference(&self) -> Option<ProductReference> {
        let hash = self.current_state_hash.as_deref()?;
        ProductReference::new(&self.product_code, hash).ok()
    }
}

/// Regulator decision for `POST /api/products/{code}/audit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditDecision {
    Accept,
    Reject,
}

impl AuditDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditDecision::Accept => "ACCEPT",
            AuditDecision::Reject => "REJECT",
        }
    }
}

/// Payload for `POST /api/products` (product registration).
#[derive(Debug, Clone, Serialize)]
pub struct RegisterProductRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AuthResponse {
    token: String,
    user: SessionUser,
}

// ─── HttpApi ──────────────────────────────────────────────────────────────────

/// Client for the FPI backend.
///
/// Owns the base URL, a shared [`SessionStore`], and a ureq agent
/// configured with an explicit timeout. Cheap to share behind an `Arc`;
/// concurrent calls for different references need no coordination.
pub struct HttpApi {
    base_url: String,
    session: Arc<SessionStore>,
    agent: ureq::Agent,
}

impl HttpApi {
    /// Create a client. Uses [`DEFAULT_BASE_URL`] when `base_url` is `None`.
    pub fn new(base_url: Option<&str>, session: Arc<SessionStore>) -> Self {
        let base_url = base_url
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();

        // Status errors are handled here, not by ureq: the backend puts
        // its explanation in the body of error responses.
        let config = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .build();

        HttpApi {
            base_url,
            session,
            agent: config.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Submit a reference to the anonymous scan endpoint.
    ///
    /// No Authorization header is attached even when logged in: anyone
    /// holding a QR code may verify, account or not. The verdict comes
    /// back exactly as the backend produced it.
    pub async fn submit_scan(
        &self,
        reference: &ProductReference,
    ) -> Result<ScanOutcome, ApiError> {
        if !reference.is_valid() {
            return Err(ApiError::validation("productId and stateHash are required"));
        }

        let agent = self.agent.clone();
        let url = format!("{}/api/products/scan", self.base_url);
        let body = serde_json::json!({
            "productId": reference.product_id.trim(),
            "stateHash": reference.state_hash.trim(),
        });

        let value = run_blocking(move || post_json(&agent, &url, None, &body)).await?;
        ScanOutcome::from_response(&value).map_err(|e| ApiError::InvalidResponse(e.to_string()))
    }

    /// Log in; on success the session store is updated and subscribers
    /// are notified.
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionUser, ApiError> {
        let email = email.trim().to_lowercase();
        validate_credentials(&email, password)?;

        let agent = self.agent.clone();
        let url = format!("{}/api/auth/login", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password });

        let value = run_blocking(move || post_json(&agent, &url, None, &body)).await?;
        self.install_session(&value)
    }

    /// Create an account with the given role and log straight in.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<SessionUser, ApiError> {
        let email = email.trim().to_lowercase();
        validate_credentials(&email, password)?;
        let role = role.trim();
        if role.is_empty() {
            return Err(ApiError::validation("role is required"));
        }

        let agent = self.agent.clone();
        let url = format!("{}/api/auth/signup", self.base_url);
        let body = serde_json::json!({ "email": email, "password": password, "role": role });

        let value = run_blocking(move || post_json(&agent, &url, None, &body)).await?;
        self.install_session(&value)
    }

    /// The backend's view of the current session user.
    pub async fn me(&self) -> Result<SessionUser, ApiError> {
        let token = self.require_token()?;
        let agent = self.agent.clone();
        let url = format!("{}/api/auth/me", self.base_url);

        let value = run_blocking(move || get_json(&agent, &url, Some(&token))).await?;
        let user = value
            .get("user")
            .cloned()
            .ok_or_else(|| ApiError::InvalidResponse("auth response missing 'user'".to_string()))?;
        serde_json::from_value(user)
            .map_err(|e| ApiError::InvalidResponse(format!("malformed user record: {}", e)))
    }

    /// Drop the session and notify subscribers. Purely local.
    pub fn logout(&self) {
        self.session.clear();
    }

    /// List products visible to the logged-in user.
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let token = self.require_token()?;
        let agent = self.agent.clone();
        let url = format!("{}/api/products", self.base_url);

        let value = run_blocking(move || get_json(&agent, &url, Some(&token))).await?;
        let rows = value
            .get("products")
            .and_then(|p| p.as_array())
            .cloned()
            .unwrap_or_default();

        rows.into_iter()
            .map(|row| {
                serde_json::from_value(row)
                    .map_err(|e| ApiError::InvalidResponse(format!("malformed product row: {}", e)))
            })
            .collect()
    }

    /// Record a regulator audit decision for a product.
    pub async fn audit(
        &self,
        product_code: &str,
        decision: AuditDecision,
    ) -> Result<(), ApiError> {
        let code = product_code.trim();
        if code.is_empty() {
            return Err(ApiError::validation("product code is required"));
        }
        let token = self.require_token()?;

        let agent = self.agent.clone();
        let url = format!(
            "{}/api/products/{}/audit",
            self.base_url,
            urlencoded(code)
        );
        let body = serde_json::json!({ "decision": decision.as_str() });

        run_blocking(move || post_json(&agent, &url, Some(&token), &body)).await?;
        Ok(())
    }

    /// Register a product; yields the reference to encode into its first QR.
    pub async fn register_product(
        &self,
        request: &RegisterProductRequest,
    ) -> Result<ProductReference, ApiError> {
        if request.name.trim().is_empty() {
            return Err(ApiError::validation("product name is required"));
        }
        let token = self.require_token()?;

        let agent = self.agent.clone();
        let url = format!("{}/api/products", self.base_url);
        let body = serde_json::to_value(request)
            .unwrap_or_else(|e| panic!("serialization error building register request: {}", e));

        let value = run_blocking(move || post_json(&agent, &url, Some(&token), &body)).await?;
        reference_from_response(&value)
    }

    /// Transfer ownership; yields the reference carrying the fresh state
    /// hash (the previous QR is stale from this point on).
    pub async fn transfer(
        &self,
        product_code: &str,
        to: &str,
    ) -> Result<ProductReference, ApiError> {
        let code = product_code.trim();
        let to = to.trim();
        if code.is_empty() || to.is_empty() {
            return Err(ApiError::validation("product code and recipient are required"));
        }
        let token = self.require_token()?;

        let agent = self.agent.clone();
        let url = format!(
            "{}/api/products/{}/transfer",
            self.base_url,
            urlencoded(code)
        );
        let body = serde_json::json!({ "to": to });

        let value = run_blocking(move || post_json(&agent, &url, Some(&token), &body)).await?;
        reference_from_response(&value)
    }

    fn require_token(&self) -> Result<String, ApiError> {
        self.session
            .token()
            .ok_or_else(|| ApiError::validation("not logged in"))
    }

    fn install_session(&self, value: &serde_json::Value) -> Result<SessionUser, ApiError> {
        let auth: AuthResponse = serde_json::from_value(value.clone())
            .map_err(|e| ApiError::InvalidResponse(format!("malformed auth response: {}", e)))?;
        self.session.set(Session {
            token: auth.token,
            user: auth.user.clone(),
        });
        Ok(auth.user)
    }
}

#[async_trait]
impl ScanBackend for HttpApi {
    async fn submit_scan(&self, reference: &ProductReference) -> Result<ScanOutcome, ApiError> {
        HttpApi::submit_scan(self, reference).await
    }
}

// ─── Blocking transport ───────────────────────────────────────────────────────

async fn run_blocking<T, F>(task: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| ApiError::Transport(format!("task join error: {}", e)))?
}

fn post_json(
    agent: &ureq::Agent,
    url: &str,
    token: Option<&str>,
    body: &serde_json::Value,
) -> Result<serde_json::Value, ApiError> {
    let mut request = agent.post(url);
    if let Some(token) = token {
        request = request.header("Authorization", &format!("Bearer {}", token));
    }
    let response = request
        .send_json(body)
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    interpret_response(response)
}

fn get_json(
    agent: &ureq::Agent,
    url: &str,
    token: Option<&str>,
) -> Result<serde_json::Value, ApiError> {
    let mut request = agent.get(url);
    if let Some(token) = token {
        request = request.header("Authorization", &format!("Bearer {}", token));
    }
    let response = request
        .call()
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    interpret_response(response)
}

fn interpret_response(
    response: ureq::http::Response<ureq::Body>,
) -> Result<serde_json::Value, ApiError> {
    let status = response.status().as_u16();
    let parsed: Result<serde_json::Value, ureq::Error> = response.into_body().read_json();

    if (200..300).contains(&status) {
        parsed.map_err(|e| ApiError::InvalidResponse(format!("failed to parse response as JSON: {}", e)))
    } else {
        let message = match parsed {
            Ok(body) => error_message(&body, status),
            Err(_) => format!("request failed ({})", status),
        };
        Err(ApiError::Request { status, message })
    }
}

/// Build the user-facing message for a non-2xx response, mirroring what
/// the backend provides: `message`, optionally suffixed with `error`.
fn error_message(body: &serde_json::Value, status: u16) -> String {
    let message = body.get("message").and_then(|m| m.as_str());
    let detail = body.get("error").and_then(|e| e.as_str());
    match (message, detail) {
        (Some(m), Some(d)) => format!("{}: {}", m, d),
        (Some(m), None) => m.to_string(),
        (None, Some(d)) => format!("request failed ({}): {}", status, d),
        (None, None) => format!("request failed ({})", status),
    }
}

/// Registration/transfer responses are backend-owned; only the product id
/// and state hash are consumed, under either naming the backend has used
/// (`productId`/`stateHash` or `product_code`/`current_state_hash`),
/// whether at the top level or nested under `product`.
fn reference_from_response(body: &serde_json::Value) -> Result<ProductReference, ApiError> {
    let obj = body.get("product").unwrap_or(body);
    let product_id = obj
        .get("productId")
        .or_else(|| obj.get("product_code"))
        .and_then(|v| v.as_str());
    let state_hash = obj
        .get("stateHash")
        .or_else(|| obj.get("current_state_hash"))
        .and_then(|v| v.as_str());

    match (product_id, state_hash) {
        (Some(p), Some(s)) => {
            ProductReference::new(p, s).map_err(|e| ApiError::InvalidResponse(e.to_string()))
        }
        _ => Err(ApiError::InvalidResponse(
            "response carries no product reference".to_string(),
        )),
    }
}

fn validate_credentials(email: &str, password: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::validation("enter a valid email"));
    }
    if password.chars().count() < 4 {
        return Err(ApiError::validation(
            "password must be at least 4 characters",
        ));
    }
    Ok(())
}

/// local@domain.tld with no whitespace and non-empty parts.
fn is_valid_email(value: &str) -> bool {
    let parts: Vec<&str> = value.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    if local.is_empty() || local.chars().any(char::is_whitespace) {
        return false;
    }
    if domain.chars().any(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}
