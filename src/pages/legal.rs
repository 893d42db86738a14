//! Static legal pages.

use leptos::prelude::*;

#[component]
pub fn TermsPage() -> impl IntoView {
    view! {
        <article class="legal-page">
            <h1>"Terms of Service"</h1>
            <h2>"Listings"</h2>
            <p>
                "Sellers are responsible for the accuracy of their listings and must own every item they offer. "
                "Items are authenticated before the sale completes."
            </p>
            <h2>"Auctions"</h2>
            <p>
                "Bids are binding. An auction closes at the time shown on the listing and the highest valid bid wins."
            </p>
            <h2>"Featured listings"</h2>
            <p>
                "Boosts are paid through our payment provider and are not refundable once the listing has been featured."
            </p>
            <p><a href="/">"Back to listings"</a></p>
        </article>
    }
}

#[component]
pub fn PrivacyPage() -> impl IntoView {
    view! {
        <article class="legal-page">
            <h1>"Privacy Policy"</h1>
            <p>
                "We store your name, email address and listings to operate the marketplace. "
                "Your session is kept in this browser's local storage until you sign out."
            </p>
            <p>
                "Payment details are handled by our payment provider and never reach our servers."
            </p>
            <p><a href="/">"Back to listings"</a></p>
        </article>
    }
}
