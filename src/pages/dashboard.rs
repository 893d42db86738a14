//! Seller dashboard: profile, own listings, refresh and logout.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the protected landing route after sign-in. The session guard owns
//! the redirect for signed-out visitors, so this page only renders a holding
//! message while the session is missing.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::listing_card::ListingCard;
use crate::config::ApiConfig;
use crate::net::types::{Listing, User};
use crate::state::listings::ListingsState;
use crate::state::session_store::SessionStore;

/// Counts shown above the seller's listing grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ListingSummary {
    pub total: usize,
    pub auctions: usize,
    pub boosted: usize,
}

impl ListingSummary {
    pub(crate) fn of(items: &[Listing]) -> Self {
        Self {
            total: items.len(),
            auctions: items.iter().filter(|l| l.is_auction).count(),
            boosted: items.iter().filter(|l| l.is_boosted).count(),
        }
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let config = expect_context::<ApiConfig>();
    let session = store.signal();
    let listings = RwSignal::new(ListingsState::pending());

    // Load once per signed-in identity: refresh the profile, then the
    // seller's listings with the current token.
    let loaded_for = RwSignal::new(None::<String>);
    let store_load = store.clone();
    Effect::new(move || {
        let Some((user_id, token)) = session.with(|s| {
            if !s.has_hydrated {
                return None;
            }
            Some((s.user.as_ref()?.id.clone(), s.token.clone()?))
        }) else {
            if loaded_for.get_untracked().is_some() {
                loaded_for.set(None);
            }
            return;
        };
        if loaded_for.get_untracked().as_deref() == Some(user_id.as_str()) {
            return;
        }
        loaded_for.set(Some(user_id.clone()));
        listings.set(ListingsState::pending());

        #[cfg(feature = "hydrate")]
        {
            let store = store_load.clone();
            let config = config.clone();
            leptos::task::spawn_local(async move {
                store.refresh_user().await;
                let result = crate::net::api::fetch_seller_listings(&config, &user_id, &token).await;
                listings.update(|s| s.settle(result));
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&store_load, &config, token);
        }
    });

    let on_logout = move |_: leptos::ev::MouseEvent| store.logout();

    let display_name = move || session.with(|s| s.user.as_ref().map(User::display_name).unwrap_or_default());
    let email = move || session.with(|s| s.user.as_ref().and_then(|u| u.email.clone()).unwrap_or_default());
    let summary = move || listings.with(|s| ListingSummary::of(&s.items));

    view! {
        <Show
            when=move || session.with(|s| s.user.is_some())
            fallback=move || view! { <div class="dashboard-page"><p>"Redirecting to sign in..."</p></div> }
        >
            <div class="dashboard-page">
                <header class="dashboard-page__header">
                    <div class="dashboard-page__profile">
                        <h1>{display_name}</h1>
                        <p class="dashboard-page__email">{email}</p>
                    </div>
                    <a class="btn dashboard-page__logout" href="/" on:click=on_logout.clone()>
                        "Sign out"
                    </a>
                </header>

                <p class="dashboard-page__summary">
                    {move || {
                        let s = summary();
                        format!("{} listings · {} auctions · {} featured", s.total, s.auctions, s.boosted)
                    }}
                </p>

                <Show when=move || listings.with(|s| s.error.is_some())>
                    <p class="dashboard-page__error">{move || listings.with(|s| s.error.clone().unwrap_or_default())}</p>
                </Show>
                <Show
                    when=move || !listings.with(|s| s.loading)
                    fallback=move || view! { <p>"Loading your listings..."</p> }
                >
                    <div class="listing-grid">
                        {move || {
                            let items = listings.with(|s| s.items.clone());
                            if items.is_empty() {
                                view! { <p class="listing-grid__empty">"You have no listings yet."</p> }.into_any()
                            } else {
                                items
                                    .into_iter()
                                    .map(|listing| view! { <ListingCard listing=listing/> })
                                    .collect_view()
                                    .into_any()
                            }
                        }}
                    </div>
                </Show>
            </div>
        </Show>
    }
}
