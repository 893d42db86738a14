//! Root application component with routing and context providers.

use std::sync::Arc;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    ParamSegment, StaticSegment,
    components::{Route, Router, Routes},
};

use crate::components::{session_guard::SessionGuard, site_header::SiteHeader};
use crate::config::ApiConfig;
use crate::net::api::HttpAuthApi;
use crate::pages::{
    boost_success::BoostSuccessPage,
    dashboard::DashboardPage,
    forgot_password::ForgotPasswordPage,
    home::HomePage,
    legal::{PrivacyPage, TermsPage},
    listing::ListingPage,
    login::LoginPage,
    signup::SignupPage,
    verify_email::VerifyEmailPage,
};
use crate::state::session_store::SessionStore;
use crate::util::persistence::LocalStorage;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session store against the REST API and browser storage,
/// provides it as context, and restores the persisted session once mounted.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ApiConfig::from_build_env();
    let store = SessionStore::new(Arc::new(HttpAuthApi::new(config.clone())), Arc::new(LocalStorage));
    provide_context(config);
    provide_context(store.clone());

    // Effects only run in the browser, so hydration never happens during SSR.
    Effect::new(move || store.hydrate());

    view! {
        <Stylesheet id="leptos" href="/pkg/auction-ui.css"/>
        <Title text="Maison Enchères"/>

        <Router>
            <SiteHeader/>
            <main class="app-main">
                <SessionGuard>
                    <Routes fallback=|| "Page not found.".into_view()>
                        <Route path=StaticSegment("") view=HomePage/>
                        <Route path=(StaticSegment("listings"), ParamSegment("id")) view=ListingPage/>
                        <Route path=(StaticSegment("auth"), StaticSegment("login")) view=LoginPage/>
                        <Route path=(StaticSegment("auth"), StaticSegment("signup")) view=SignupPage/>
                        <Route path=(StaticSegment("auth"), StaticSegment("verify")) view=VerifyEmailPage/>
                        <Route
                            path=(StaticSegment("auth"), StaticSegment("forgot-password"))
                            view=ForgotPasswordPage
                        />
                        <Route path=StaticSegment("dashboard") view=DashboardPage/>
                        <Route path=(StaticSegment("boost"), StaticSegment("success")) view=BoostSuccessPage/>
                        <Route path=(StaticSegment("legal"), StaticSegment("terms")) view=TermsPage/>
                        <Route path=(StaticSegment("legal"), StaticSegment("privacy")) view=PrivacyPage/>
                    </Routes>
                </SessionGuard>
            </main>
        </Router>
    }
}
