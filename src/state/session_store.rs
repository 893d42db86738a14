//! Persisted session store: the single source of truth for authentication.
//!
//! SYSTEM CONTEXT
//! ==============
//! One `SessionStore` is created by the root component and provided through
//! Leptos context. Forms call its async actions, the session guard watches
//! its signal, and every committed change writes the persisted subset to
//! durable storage.
//!
//! CONCURRENCY
//! ===========
//! Actions run on the UI thread and suspend only at network I/O. Each
//! `login`/`signup` takes a request number from its own counter; a call that
//! settles after a newer call *of the same kind* was dispatched hands its
//! result back to its caller but does not commit, so the most recently issued
//! login decides the identity. A signup never invalidates a pending login.
//! `is_loading` stays set while any login or signup is outstanding.

#[cfg(test)]
#[path = "session_store_test.rs"]
mod session_store_test;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use leptos::prelude::*;

use super::session::{PersistEnvelope, Session};
use crate::net::api::AuthApi;
use crate::net::error::ApiError;
use crate::net::types::{Credentials, LoginData, SignupForm, SignupPayload, User};
use crate::util::persistence::{SessionStorage, load_json, save_json};

/// Durable storage key for the persisted session subset.
pub const STORAGE_KEY: &str = "auth-storage";

/// Injectable session service. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct SessionStore {
    state: ArcRwSignal<Session>,
    api: Arc<dyn AuthApi>,
    storage: Arc<dyn SessionStorage>,
    latest_login: Arc<AtomicU64>,
    latest_signup: Arc<AtomicU64>,
    in_flight: Arc<AtomicUsize>,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Login,
    Signup,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("state", &self.snapshot())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Create an empty, unhydrated store.
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: ArcRwSignal::new(Session::default()),
            api,
            storage,
            latest_login: Arc::new(AtomicU64::new(0)),
            latest_signup: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reactive handle on the session. Reading it with `.get()` inside an
    /// effect subscribes to every commit.
    #[must_use]
    pub fn state(&self) -> ArcRwSignal<Session> {
        self.state.clone()
    }

    /// Arena-backed `Copy` handle on the same signal, owned by the current
    /// reactive owner. Call from inside components only.
    #[must_use]
    pub fn signal(&self) -> RwSignal<Session> {
        RwSignal::from(self.state.clone())
    }

    /// Untracked copy of the current session.
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.state.get_untracked()
    }

    // =========================================================================
    // HYDRATION
    // =========================================================================

    /// Restore the persisted subset from durable storage and mark the store
    /// hydrated. Only the first call reads storage.
    pub fn hydrate(&self) {
        if self.state.with_untracked(|s| s.has_hydrated) {
            return;
        }
        let restored = load_json::<PersistEnvelope>(self.storage.as_ref(), STORAGE_KEY);
        self.state.update(|s| {
            if let Some(envelope) = restored {
                s.restore(envelope.state);
            }
            s.has_hydrated = true;
        });
        log::debug!("session hydrated (authenticated: {})", self.state.with_untracked(|s| s.is_authenticated));
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Authenticate with email and password.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the backend after mirroring its message
    /// into the session's `error` and clearing any identity.
    pub async fn login(&self, credentials: Credentials) -> Result<(), ApiError> {
        let request = self.begin_request(Action::Login);
        let result = self.api.login(&credentials).await;
        let Some(still_loading) = self.finish_request(Action::Login, request) else {
            return result.map(|_| ());
        };
        match result {
            Ok(LoginData { user, token }) => {
                self.commit(|s| {
                    s.user = Some(user);
                    s.token = Some(token);
                    s.is_authenticated = true;
                    s.is_loading = still_loading;
                    s.error = None;
                });
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                self.commit(|s| {
                    s.clear_identity();
                    s.error = Some(message);
                    s.is_loading = still_loading;
                });
                Err(err)
            }
        }
    }

    /// Create an account. Success does not sign in: the account must be
    /// verified by email first.
    ///
    /// # Errors
    ///
    /// Returns the [`ApiError`] from the backend after mirroring its message
    /// into the session's `error`.
    pub async fn signup(&self, form: SignupForm) -> Result<(), ApiError> {
        let request = self.begin_request(Action::Signup);
        let payload = SignupPayload::from_form(form);
        let result = self.api.create_user(&payload).await;
        let Some(still_loading) = self.finish_request(Action::Signup, request) else {
            return result;
        };
        match result {
            Ok(()) => {
                self.commit(|s| {
                    s.is_loading = still_loading;
                    s.error = None;
                });
                Ok(())
            }
            Err(err) => {
                let message = err.to_string();
                self.commit(|s| {
                    s.error = Some(message);
                    s.is_loading = still_loading;
                });
                Err(err)
            }
        }
    }

    /// Forget the session locally. No network call.
    pub fn logout(&self) {
        self.commit(|s| {
            s.clear_identity();
            s.error = None;
        });
    }

    /// Re-fetch the current user record. Best-effort: failures are logged
    /// and leave the session as it was.
    pub async fn refresh_user(&self) {
        let held = self.state.with_untracked(|s| match (&s.user, &s.token) {
            (Some(user), Some(token)) => Some((user.id.clone(), token.clone())),
            _ => None,
        });
        let Some((user_id, token)) = held else {
            return;
        };
        match self.api.fetch_user(&user_id, &token).await {
            Ok(user) => {
                // A logout or re-login while the fetch was out invalidates it.
                if self.state.with_untracked(|s| s.token.as_deref() != Some(token.as_str())) {
                    log::debug!("dropping refreshed user {user_id}: session changed");
                    return;
                }
                self.commit(|s| {
                    s.user = Some(user);
                    s.is_authenticated = true;
                });
            }
            Err(err) => log::warn!("failed to refresh user {user_id}: {err:?}"),
        }
    }

    // =========================================================================
    // SETTERS
    // =========================================================================

    pub fn set_error(&self, message: impl Into<String>) {
        let message = message.into();
        self.commit(|s| s.error = Some(message));
    }

    pub fn clear_error(&self) {
        self.commit(|s| s.error = None);
    }

    /// Replace the user record; `is_authenticated` follows `user.is_some()`.
    pub fn set_user(&self, user: Option<User>) {
        self.commit(|s| {
            s.is_authenticated = user.is_some();
            s.user = user;
        });
    }

    pub fn set_token(&self, token: Option<String>) {
        self.commit(|s| s.token = token);
    }

    pub fn set_loading(&self, loading: bool) {
        self.commit(|s| s.is_loading = loading);
    }

    pub fn set_has_hydrated(&self, hydrated: bool) {
        self.state.update(|s| s.has_hydrated = hydrated);
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn generation(&self, action: Action) -> &AtomicU64 {
        match action {
            Action::Login => &self.latest_login,
            Action::Signup => &self.latest_signup,
        }
    }

    fn begin_request(&self, action: Action) -> u64 {
        let request = self.generation(action).fetch_add(1, Ordering::SeqCst) + 1;
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        self.commit(|s| {
            s.is_loading = true;
            s.error = None;
        });
        request
    }

    /// Settle `request`. Returns `None` for a stale result that must not be
    /// committed, otherwise whether other requests are still outstanding.
    fn finish_request(&self, action: Action, request: u64) -> Option<bool> {
        let remaining = self.in_flight.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        if self.generation(action).load(Ordering::SeqCst) == request {
            return Some(remaining > 0);
        }
        log::debug!("discarding stale {action:?} result (request {request})");
        if remaining == 0 {
            self.commit(|s| s.is_loading = false);
        }
        None
    }

    fn commit(&self, mutate: impl FnOnce(&mut Session)) {
        self.state.update(mutate);
        self.persist();
    }

    /// Write the persisted subset. Skipped until hydration so the default
    /// empty state never overwrites a stored session.
    fn persist(&self) {
        let Some(persisted) = self
            .state
            .with_untracked(|s| s.has_hydrated.then(|| s.persisted()))
        else {
            return;
        };
        if let Err(e) = save_json(self.storage.as_ref(), STORAGE_KEY, &PersistEnvelope::from(persisted)) {
            log::warn!("failed to persist session: {e}");
        }
    }
}
