//! Route-level access control driven by the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component installs one guard around the router. Decisions are a
//! pure function of `(session, path)` so the rules stay testable outside the
//! browser; the installed effect only re-evaluates and navigates.
//!
//! ORDERING
//! ========
//! Nothing is decided until the store reports `has_hydrated`. Before that the
//! default empty session would bounce a returning user to the login page.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use leptos::prelude::*;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::state::session::Session;
use crate::state::session_store::SessionStore;

pub const LOGIN_PATH: &str = "/auth/login";
pub const REDIRECT_PARAM: &str = "redirect";
pub const DEFAULT_AFTER_LOGIN: &str = "/dashboard";

/// Path prefixes reachable without a session. `/` is matched exactly.
const PUBLIC_PREFIXES: &[&str] = &[
    "/auth/login",
    "/auth/signup",
    "/auth/verify",
    "/auth/forgot-password",
    "/auth/reset-password",
    "/listings",
    "/legal",
    "/boost",
];

/// Characters left as-is by browser `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session not restored yet; decide nothing.
    Wait,
    Allow,
    /// Navigate to the contained URL.
    Redirect(String),
    /// Session claims authentication without a user: log out, then navigate.
    ForceLogout(String),
}

/// `true` for the home page and anything under a public prefix.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    if path.is_empty() || path == "/" {
        return true;
    }
    PUBLIC_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Percent-encode a query parameter value the way browsers'
/// `encodeURIComponent` does (spaces become `%20`).
#[must_use]
pub fn encode_uri_component(raw: &str) -> String {
    utf8_percent_encode(raw, URI_COMPONENT).to_string()
}

/// Login URL carrying `path` as the URL-encoded return destination.
#[must_use]
pub fn login_redirect_url(path: &str) -> String {
    format!("{LOGIN_PATH}?{REDIRECT_PARAM}={}", encode_uri_component(path))
}

/// Where to go after a successful login. Only same-site absolute paths are
/// honoured; anything else (missing, external, protocol-relative, the login
/// page itself) falls back to [`DEFAULT_AFTER_LOGIN`].
#[must_use]
pub fn safe_redirect_target(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.starts_with("/\\")
                && !path.starts_with(LOGIN_PATH) =>
        {
            path.to_owned()
        }
        _ => DEFAULT_AFTER_LOGIN.to_owned(),
    }
}

/// Decide what the guard should do for `session` at `path`.
#[must_use]
pub fn evaluate(session: &Session, path: &str) -> GuardDecision {
    if !session.has_hydrated {
        return GuardDecision::Wait;
    }
    if is_public_path(path) {
        return GuardDecision::Allow;
    }
    if !session.is_authenticated {
        return GuardDecision::Redirect(login_redirect_url(path));
    }
    if session.user.is_none() {
        return GuardDecision::ForceLogout(LOGIN_PATH.to_owned());
    }
    GuardDecision::Allow
}

/// Evaluate the current session at `path` and carry out the decision.
pub fn enforce<F>(store: &SessionStore, path: &str, navigate: &F) -> GuardDecision
where
    F: Fn(&str),
{
    let decision = evaluate(&store.snapshot(), path);
    match &decision {
        GuardDecision::Wait | GuardDecision::Allow => {}
        GuardDecision::Redirect(target) => {
            log::debug!("guard: {path} requires a session, redirecting");
            navigate(target);
        }
        GuardDecision::ForceLogout(target) => {
            log::warn!("guard: session authenticated without a user, forcing logout");
            store.logout();
            navigate(target);
        }
    }
    decision
}

/// Re-run [`enforce`] whenever the session or the current path changes.
pub fn install_session_guard<P, F>(store: SessionStore, pathname: P, navigate: F)
where
    P: Fn() -> String + 'static,
    F: Fn(&str) + 'static,
{
    let session = store.state();
    Effect::new(move || {
        session.track();
        let path = pathname();
        enforce(&store, &path, &navigate);
    });
}
