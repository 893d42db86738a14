//! Login page: email + password against the session store.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session guard sends unauthenticated visitors here with a `redirect`
//! query parameter. Once the store reports an authenticated user this page
//! forwards to that destination (or the dashboard).

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_navigate, use_query_map};

use crate::net::types::Credentials;
use crate::state::session_store::SessionStore;
use crate::util::guard::{REDIRECT_PARAM, safe_redirect_target};

/// Loose shape check: one `@`, non-empty local part, dotted domain, no
/// whitespace. The backend does the real validation.
pub(crate) fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

pub(crate) fn validate_login_input(email: &str, password: &str) -> Result<Credentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !is_plausible_email(email) {
        return Err("Enter a valid email address.");
    }
    Ok(Credentials { email: email.to_owned(), password: password.to_owned() })
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let session = store.signal();
    let query = use_query_map();
    let navigate = use_navigate();

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let form_error = RwSignal::new(None::<String>);

    // Forward once signed in, whether restored from storage or just now.
    Effect::new(move || {
        let ready = session.with(|s| s.has_hydrated && s.is_authenticated && s.user.is_some());
        if ready {
            let target = safe_redirect_target(query.with(|q| q.get(REDIRECT_PARAM)).as_deref());
            navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
        }
    });

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.with_untracked(|s| s.is_loading) {
            return;
        }
        let credentials = match validate_login_input(&email.get_untracked(), &password.get_untracked()) {
            Ok(credentials) => credentials,
            Err(message) => {
                form_error.set(Some(message.to_owned()));
                return;
            }
        };
        form_error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            leptos::task::spawn_local(async move {
                if let Err(e) = store.login(credentials).await {
                    form_error.set(Some(e.to_string()));
                    password.set(String::new());
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&store, credentials);
        }
    };

    let busy = move || session.with(|s| s.is_loading);

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Welcome back"</h1>
                <p class="auth-card__subtitle">"Sign in to bid, sell and manage your listings."</p>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        autocomplete="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        autocomplete="current-password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=busy>
                        {move || if busy() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <Show when=move || form_error.get().is_some()>
                    <p class="auth-message auth-message--error">{move || form_error.get().unwrap_or_default()}</p>
                </Show>
                <p class="auth-card__links">
                    <a href="/auth/forgot-password">"Forgot password?"</a>
                    " · "
                    <a href="/auth/signup">"Create an account"</a>
                </p>
            </div>
        </div>
    }
}
