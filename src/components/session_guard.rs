//! Router-level wrapper that enforces session access rules.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::session_store::SessionStore;
use crate::util::guard::install_session_guard;

/// Passes `children` through unchanged while redirecting away from protected
/// routes whenever the session does not allow them. Must sit inside `<Router>`.
#[component]
pub fn SessionGuard(children: Children) -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let location = use_location();
    let navigate = use_navigate();

    install_session_guard(
        store,
        move || location.pathname.get(),
        move |url: &str| navigate(url, NavigateOptions::default()),
    );

    children()
}
