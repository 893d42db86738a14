//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the session guard and by user-aware components to coordinate
//! login redirects and identity-dependent rendering. Mutated only through
//! [`crate::state::session_store::SessionStore`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use serde::{Deserialize, Serialize};

use crate::net::types::User;

/// Authentication state for the current browser user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
    /// Must equal `user.is_some()`; the guard force-logs-out otherwise.
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    pub has_hydrated: bool,
}

impl Session {
    /// `true` when the authenticated flag disagrees with the user record.
    #[must_use]
    pub fn is_inconsistent(&self) -> bool {
        self.is_authenticated != self.user.is_some()
    }

    /// Drop identity and credential. Transient flags other than `error` are
    /// left alone.
    pub fn clear_identity(&mut self) {
        self.user = None;
        self.token = None;
        self.is_authenticated = false;
    }

    #[must_use]
    pub fn persisted(&self) -> PersistedSession {
        PersistedSession {
            user: self.user.clone(),
            token: self.token.clone(),
            is_authenticated: self.is_authenticated,
        }
    }

    /// Overlay restored fields. Transient flags keep their process-start
    /// values.
    pub fn restore(&mut self, persisted: PersistedSession) {
        self.user = persisted.user;
        self.token = persisted.token;
        self.is_authenticated = persisted.is_authenticated;
    }
}

/// The subset of [`Session`] written to durable storage.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSession {
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

/// Versioned on-disk wrapper: `{"state": {...}, "version": 0}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PersistEnvelope {
    pub state: PersistedSession,
    #[serde(default)]
    pub version: u32,
}

pub const PERSIST_VERSION: u32 = 0;

impl From<PersistedSession> for PersistEnvelope {
    fn from(state: PersistedSession) -> Self {
        Self { state, version: PERSIST_VERSION }
    }
}
