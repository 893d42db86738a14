//! Signup page. A successful signup does not sign the user in: the account
//! must be verified by email, so the page forwards to the verification notice.

#[cfg(test)]
#[path = "signup_test.rs"]
mod signup_test;

use leptos::prelude::*;
#[cfg(feature = "hydrate")]
use leptos_router::NavigateOptions;
#[cfg(feature = "hydrate")]
use leptos_router::hooks::use_navigate;

use super::login::is_plausible_email;
use crate::net::types::SignupForm;
use crate::state::session_store::SessionStore;
use crate::util::guard::encode_uri_component;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn validate_signup_input(
    first_name: &str,
    last_name: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<SignupForm, &'static str> {
    let (first_name, last_name, email) = (first_name.trim(), last_name.trim(), email.trim());
    if first_name.is_empty() || last_name.is_empty() {
        return Err("Enter your first and last name.");
    }
    if !is_plausible_email(email) {
        return Err("Enter a valid email address.");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Password must be at least 8 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(SignupForm {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        email: email.to_owned(),
        password: password.to_owned(),
    })
}

/// Where to send a freshly registered user.
#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
pub(crate) fn verify_notice_url(email: &str) -> String {
    format!("/auth/verify?email={}", encode_uri_component(email))
}

#[component]
pub fn SignupPage() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let session = store.signal();
    #[cfg(feature = "hydrate")]
    let navigate = use_navigate();

    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let form_error = RwSignal::new(None::<String>);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if session.with_untracked(|s| s.is_loading) {
            return;
        }
        let form = match validate_signup_input(
            &first_name.get_untracked(),
            &last_name.get_untracked(),
            &email.get_untracked(),
            &password.get_untracked(),
            &confirm.get_untracked(),
        ) {
            Ok(form) => form,
            Err(message) => {
                form_error.set(Some(message.to_owned()));
                return;
            }
        };
        form_error.set(None);

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                let target = verify_notice_url(&form.email);
                match store.signup(form).await {
                    Ok(()) => navigate(&target, NavigateOptions::default()),
                    Err(e) => form_error.set(Some(e.to_string())),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&store, form);
        }
    };

    let busy = move || session.with(|s| s.is_loading);

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Create your account"</h1>
                <p class="auth-card__subtitle">"Buy and sell authenticated luxury pieces."</p>
                <form class="auth-form" on:submit=on_submit>
                    <div class="auth-form__row">
                        <input
                            class="auth-input"
                            type="text"
                            autocomplete="given-name"
                            placeholder="First name"
                            prop:value=move || first_name.get()
                            on:input=move |ev| first_name.set(event_target_value(&ev))
                        />
                        <input
                            class="auth-input"
                            type="text"
                            autocomplete="family-name"
                            placeholder="Last name"
                            prop:value=move || last_name.get()
                            on:input=move |ev| last_name.set(event_target_value(&ev))
                        />
                    </div>
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
                        autocomplete="new-password"
                        placeholder="Password (8+ characters)"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        autocomplete="new-password"
                        placeholder="Confirm password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=busy>
                        {move || if busy() { "Creating account..." } else { "Create account" }}
                    </button>
                </form>
                <Show when=move || form_error.get().is_some()>
                    <p class="auth-message auth-message--error">{move || form_error.get().unwrap_or_default()}</p>
                </Show>
                <p class="auth-card__links">
                    "Already registered? "
                    <a href="/auth/login">"Sign in"</a>
                </p>
                <p class="auth-card__legal">
                    "By creating an account you accept our "
                    <a href="/legal/terms">"Terms"</a>
                    " and "
                    <a href="/legal/privacy">"Privacy Policy"</a>
                    "."
                </p>
            </div>
        </div>
    }
}
