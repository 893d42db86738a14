//! Post-signup notice asking the user to confirm their email address.

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let query = use_query_map();
    let email = move || query.with(|q| q.get("email")).filter(|e| !e.trim().is_empty());

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Check your inbox"</h1>
                <p class="auth-card__subtitle">
                    {move || match email() {
                        Some(address) => format!("We sent a verification link to {address}."),
                        None => "We sent you a verification link.".to_owned(),
                    }}
                </p>
                <p>"Open the link to activate your account, then sign in."</p>
                <p class="auth-card__links">
                    <a href="/auth/login">"Back to sign in"</a>
                </p>
            </div>
        </div>
    }
}
