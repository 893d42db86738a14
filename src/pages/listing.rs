//! Listing detail page: gallery, price, description and auction countdown.

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;

use crate::components::auction_countdown::AuctionCountdown;
use crate::config::ApiConfig;
use crate::net::types::Listing;
use crate::util::format::format_price;

#[derive(Clone, Debug, Default)]
struct DetailState {
    listing: Option<Listing>,
    loading: bool,
    error: Option<String>,
}

#[component]
pub fn ListingPage() -> impl IntoView {
    let config = expect_context::<ApiConfig>();
    let params = use_params_map();
    let detail = RwSignal::new(DetailState { loading: true, ..DetailState::default() });

    // Refetch whenever the route id changes.
    Effect::new(move || {
        let Some(listing_id) = params.with(|p| p.get("id")) else {
            detail.set(DetailState { error: Some("Listing not found.".to_owned()), ..DetailState::default() });
            return;
        };
        detail.update(|d| {
            d.loading = true;
            d.error = None;
        });

        #[cfg(feature = "hydrate")]
        {
            let config = config.clone();
            leptos::task::spawn_local(async move {
                let result = crate::net::api::fetch_listing(&config, &listing_id).await;
                detail.update(|d| {
                    d.loading = false;
                    match result {
                        Ok(listing) => d.listing = Some(listing),
                        Err(e) => {
                            log::warn!("listing {listing_id}: fetch failed: {e}");
                            d.listing = None;
                            d.error = Some(e.to_string());
                        }
                    }
                });
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&config, listing_id);
        }
    });

    view! {
        <div class="listing-page">
            <p class="listing-page__back"><a href="/">"← All listings"</a></p>
            {move || {
                let state = detail.get();
                if state.loading {
                    return view! { <p class="listing-page__loading">"Loading listing..."</p> }.into_any();
                }
                match state.listing {
                    Some(listing) => view! { <ListingDetail listing=listing/> }.into_any(),
                    None => view! {
                        <p class="listing-page__error">
                            {state.error.unwrap_or_else(|| "Listing not found.".to_owned())}
                        </p>
                    }
                    .into_any(),
                }
            }}
        </div>
    }
}

#[component]
fn ListingDetail(listing: Listing) -> impl IntoView {
    let price = format_price(listing.display_amount(), &listing.currency);
    let caption = listing.price_caption();
    let ends_at = listing.auction_ends_at.filter(|_| listing.is_auction);
    let boosted = listing.is_boosted;
    let Listing { title, description, images, category, .. } = listing;

    view! {
        <article class="listing-detail">
            <div class="listing-detail__gallery">
                {images
                    .into_iter()
                    .map(|src| view! { <img class="listing-detail__image" src=src alt=""/> })
                    .collect_view()}
            </div>
            <div class="listing-detail__info">
                <Show when=move || boosted>
                    <span class="listing-card__badge">"Featured"</span>
                </Show>
                <h1>{title}</h1>
                {category.map(|c| view! { <p class="listing-detail__category">{c}</p> })}
                <p class="listing-detail__price">
                    <span class="listing-detail__price-label">{caption}</span>
                    " "
                    {price}
                </p>
                {ends_at.map(|ends_at| view! {
                    <p class="listing-detail__ends">"Ends in " <AuctionCountdown ends_at=ends_at/></p>
                })}
                <p class="listing-detail__description">{description}</p>
            </div>
        </article>
    }
}
