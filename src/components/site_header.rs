//! Top navigation bar with session-aware links.

use leptos::prelude::*;

use crate::net::types::User;
use crate::state::session_store::SessionStore;

#[component]
pub fn SiteHeader() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let session = store.state();

    let signed_in = {
        let session = session.clone();
        move || session.with(|s| s.is_authenticated)
    };
    let greeting = move || session.with(|s| s.user.as_ref().map(User::display_name)).unwrap_or_default();

    view! {
        <header class="site-header">
            <a class="site-header__brand" href="/">"Maison Enchères"</a>
            <nav class="site-header__nav">
                <a href="/">"Browse"</a>
                <Show
                    when=signed_in
                    fallback=|| view! {
                        <a href="/auth/login">"Sign in"</a>
                        <a class="site-header__cta" href="/auth/signup">"Create account"</a>
                    }
                >
                    <a href="/dashboard">"Dashboard"</a>
                    <span class="site-header__user">{greeting.clone()}</span>
                    <a
                        class="site-header__logout"
                        href="/"
                        on:click={
                            let store = store.clone();
                            move |_| store.logout()
                        }
                    >
                        "Sign out"
                    </a>
                </Show>
            </nav>
        </header>
    }
}
