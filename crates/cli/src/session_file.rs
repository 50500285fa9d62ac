//! Session persistence between CLI invocations.
//!
//! The web front end this tool replaces cached its token in browser
//! storage; the CLI analog is a small JSON file. Written on login,
//! removed on logout, read everywhere else. A missing or corrupt file
//! simply means "not logged in".

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use fpi_client::Session;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    pub token: String,
    pub email: String,
    pub role: String,
    /// RFC 3339 login time, informational only.
    pub saved_at: String,
}

/// `$FPI_SESSION_FILE`, else `~/.fpi-session.json`, else the cwd.
pub(crate) fn default_path() -> PathBuf {
    if let Ok(path) = std::env::var("FPI_SESSION_FILE") {
        return PathBuf::from(path);
    }
    match std::env::var("HOME") {
        Ok(home) => Path::new(&home).join(".fpi-session.json"),
        Err(_) => PathBuf::from(".fpi-session.json"),
    }
}

pub(crate) fn load(path: &Path) -> Option<StoredSession> {
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

pub(crate) fn save(path: &Path, session: &Session) -> std::io::Result<()> {
    let stored = StoredSession {
        token: session.token.clone(),
        email: session.user.email.clone(),
        role: session.user.role.clone(),
        saved_at: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
    };
    let json = serde_json::to_string_pretty(&stored)
        .unwrap_or_else(|e| panic!("serialization error writing session: {}", e));
    std::fs::write(path, json)
}

pub(crate) fn remove(path: &Path) -> std::io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
