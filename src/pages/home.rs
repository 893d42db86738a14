//! Home page: public listing catalogue with a search filter.

use leptos::prelude::*;

use crate::components::listing_card::ListingCard;
use crate::config::ApiConfig;
use crate::state::listings::ListingsState;

#[component]
pub fn HomePage() -> impl IntoView {
    let config = expect_context::<ApiConfig>();
    let listings = RwSignal::new(ListingsState::pending());
    let query = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let result = crate::net::api::fetch_listings(&config).await;
        listings.update(|s| s.settle(result));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = config;

    let visible = move || listings.with(|s| s.visible(&query.get()));

    view! {
        <div class="home-page">
            <section class="home-page__hero">
                <h1>"Authenticated luxury, auctioned"</h1>
                <p>"Watches, bags and jewellery from verified sellers."</p>
                <input
                    class="home-page__search"
                    type="search"
                    placeholder="Search by title or category"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                />
            </section>
            <Show when=move || listings.with(|s| s.error.is_some())>
                <p class="home-page__error">{move || listings.with(|s| s.error.clone().unwrap_or_default())}</p>
            </Show>
            <Show
                when=move || !listings.with(|s| s.loading)
                fallback=move || view! { <p class="home-page__loading">"Loading listings..."</p> }
            >
                <div class="listing-grid">
                    {move || {
                        let items = visible();
                        if items.is_empty() {
                            view! { <p class="listing-grid__empty">"No listings match your search."</p> }.into_any()
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
    }
}
