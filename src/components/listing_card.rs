//! Card for one listing in catalogue and dashboard grids.

use leptos::prelude::*;

use crate::components::auction_countdown::AuctionCountdown;
use crate::net::types::Listing;
use crate::util::format::format_price;

#[component]
pub fn ListingCard(listing: Listing) -> impl IntoView {
    let href = format!("/listings/{}", listing.id);
    let price = format_price(listing.display_amount(), &listing.currency);
    let price_label = listing.price_caption();
    let boosted = listing.is_boosted;
    let ends_at = listing.auction_ends_at.filter(|_| listing.is_auction);
    let cover = listing.cover_image().map(str::to_owned);
    let Listing { title, category, .. } = listing;
    let alt = title.clone();

    view! {
        <a class="listing-card" class:listing-card--boosted=boosted href=href>
            {cover.map(|src| view! { <img class="listing-card__image" src=src alt=alt/> })}
            <Show when=move || boosted>
                <span class="listing-card__badge">"Featured"</span>
            </Show>
            <span class="listing-card__title">{title}</span>
            {category.map(|c| view! { <span class="listing-card__category">{c}</span> })}
            <span class="listing-card__price">
                <span class="listing-card__price-label">{price_label}</span>
                " "
                {price}
            </span>
            {ends_at.map(|ends_at| view! { <AuctionCountdown ends_at=ends_at/> })}
        </a>
    }
}
