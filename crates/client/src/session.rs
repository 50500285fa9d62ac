//! Explicit session state with change notification.
//!
//! The session is process-wide state with a clear lifecycle: set when a
//! login or signup succeeds, cleared on logout, read-only everywhere
//! else. It lives in a [`SessionStore`] object that callers are handed —
//! not in globals — and every mutation is published to subscribers, so
//! components that care about login state listen instead of polling.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// The authenticated user as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub email: String,
    pub role: String,
}

/// An active backend session: bearer token plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: SessionUser,
}

/// Published on every session mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn { email: String, role: String },
    LoggedOut,
}

struct SessionInner {
    session: Option<Session>,
    subscribers: Vec<Sender<SessionEvent>>,
}

/// Holder of the current session.
///
/// Reads are cheap clones; writes publish a [`SessionEvent`] to every
/// live subscriber. Subscribers that have gone away are dropped at the
/// next publish.
pub struct SessionStore {
    inner: Mutex<SessionInner>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            inner: Mutex::new(SessionInner {
                session: None,
                subscribers: Vec::new(),
            }),
        }
    }

    /// Install a session (login/signup response) and notify subscribers.
    pub fn set(&self, session: Session) {
        let event = SessionEvent::LoggedIn {
            email: session.user.email.clone(),
            role: session.user.role.clone(),
        };
        let mut inner = self.lock();
        inner.session = Some(session);
        publish(&mut inner, event);
    }

    /// Clear the session (logout) and notify subscribers.
    ///
    /// Clearing an already-empty store is a no-op — no event is published.
    pub fn clear(&self) {
        let mut inner = self.lock();
        if inner.session.take().is_some() {
            publish(&mut inner, SessionEvent::LoggedOut);
        }
    }

    /// The current bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.lock().session.as_ref().map(|s| s.token.clone())
    }

    /// A snapshot of the current session, if any.
    pub fn current(&self) -> Option<Session> {
        self.lock().session.clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().session.is_some()
    }

    /// Subscribe to session mutations.
    ///
    /// Events fire for mutations after the call; the receiver sees
    /// logins and logouts in the order they happened.
    pub fn subscribe(&self) -> Receiver<SessionEvent> {
        let (tx, rx) = mpsc::channel();
        self.lock().subscribers.push(tx);
        rx
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionInner> {
        // A poisoned session lock means a panic mid-mutation; the state
        // itself is a plain Option swap, safe to keep using.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new()
    }
}

fn publish(inner: &mut SessionInner, event: SessionEvent) {
    inner
        .subscribers
        .retain(|tx| tx.send(event.clone()).is_ok());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_session() -> Session {
        Session {
            token: "tok-1".to_string(),
            user: SessionUser {
                email: "reg@example.com".to_string(),
                role: "regulator".to_string(),
            },
        }
    }

    #[test]
    fn starts_logged_out() {
        let store = SessionStore::new();
        assert!(!store.is_logged_in());
        assert_eq!(store.token(), None);
    }

    #[test]
    fn set_then_read() {
        let store = SessionStore::new();
        store.set(demo_session());
        assert_eq!(store.token(), Some("tok-1".to_string()));
        assert_eq!(store.current().unwrap().user.role, "regulator");
    }

    #[test]
    fn subscribers_see_events_in_order() {
        let store = SessionStore::new();
        let rx = store.subscribe();

        store.set(demo_session());
        store.clear();

        assert_eq!(
            rx.recv().unwrap(),
            SessionEvent::LoggedIn {
                email: "reg@example.com".to_string(),
                role: "regulator".to_string(),
            }
        );
        assert_eq!(rx.recv().unwrap(), SessionEvent::LoggedOut);
    }

    #[test]
    fn clearing_empty_store_publishes_nothing() {
        let store = SessionStore::new();
        let rx = store.subscribe();
        store.clear();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn dead_subscribers_are_dropped() {
        let store = SessionStore::new();
        drop(store.subscribe());
        let rx = store.subscribe();
        store.set(demo_session());
        assert!(matches!(
            rx.recv().unwrap(),
            SessionEvent::LoggedIn { .. }
        ));
    }
}
