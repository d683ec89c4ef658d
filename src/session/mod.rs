//! Session storage for the signed-in user.
//!
//! A session is nothing more than two strings: the username the token was
//! issued for and the bearer token itself. Stores are injected into the API
//! client so every authenticated request reads the current values right
//! before it is sent.

mod file;

pub use file::FileSessionStore;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The client-held pair of username and bearer token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl Session {
    pub fn new(username: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            token: Some(token.into()),
        }
    }

    /// True when both a username and a token are held.
    pub fn is_authenticated(&self) -> bool {
        self.username.is_some() && self.token.is_some()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to write session file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Accessor for the persisted session.
///
/// Reads never fail: an unreadable backing store reports an empty session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Session;
    fn store(&self, session: &Session) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;

    fn set_session(&self, username: &str, token: &str) -> Result<(), SessionError> {
        self.store(&Session::new(username, token))
    }

    fn username(&self) -> Option<String> {
        self.load().username
    }

    fn token(&self) -> Option<String> {
        self.load().token
    }
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Session {
        self.inner.read().clone()
    }

    fn store(&self, session: &Session) -> Result<(), SessionError> {
        *self.inner.write() = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.inner.write() = Session::default();
        Ok(())
    }
}
