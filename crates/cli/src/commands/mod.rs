//! Subcommand handlers. Each `run_*` prints its result and returns the
//! process exit code: 0 success, 1 backend/verdict failure, 2 bad input.

pub(crate) mod auth;
pub(crate) mod decode;
pub(crate) mod encode;
pub(crate) mod lifecycle;
pub(crate) mod products;
pub(crate) mod scan;

use std::path::PathBuf;
use std::sync::Arc;

use fpi_client::{ApiError, HttpApi, Session, SessionStore, SessionUser};

use crate::session_file;
use crate::OutputFormat;

/// Everything a handler needs besides its own arguments.
pub(crate) struct Context {
    pub output: OutputFormat,
    pub base_url: Option<String>,
    pub session_path: PathBuf,
}

impl Context {
    /// A session store primed from the session file, if one exists.
    pub(crate) fn store(&self) -> Arc<SessionStore> {
        let store = Arc::new(SessionStore::new());
        if let Some(stored) = session_file::load(&self.session_path) {
            store.set(Session {
                token: stored.token,
                user: SessionUser {
                    email: stored.email,
                    role: stored.role,
                },
            });
        }
        store
    }

    pub(crate) fn api(&self) -> (Arc<SessionStore>, HttpApi) {
        let store = self.store();
        let api = HttpApi::new(self.base_url.as_deref(), store.clone());
        (store, api)
    }
}

pub(crate) fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Runtime::new().expect("failed to create tokio runtime")
}

/// Bad input (validation) is 2, everything else 1.
pub(crate) fn failure_code(err: &ApiError) -> i32 {
    match err {
        ApiError::Validation { .. } => 2,
        _ => 1,
    }
}
