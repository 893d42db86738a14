//! Password reset entry point. Resets are handled by support for now, so the
//! page is a static notice.

use leptos::prelude::*;

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Forgot your password?"</h1>
                <p class="auth-card__subtitle">
                    "Contact support from the email address on your account and we will send you a reset link."
                </p>
                <p class="auth-card__links">
                    <a href="/auth/login">"Back to sign in"</a>
                </p>
            </div>
        </div>
    }
}
