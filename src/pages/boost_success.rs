//! Return page after a boost checkout at the payment provider.
//!
//! SYSTEM CONTEXT
//! ==============
//! The provider redirects here with `?session_id=...`. The page asks the
//! backend to verify that checkout session and reports the outcome. The
//! route is public because the redirect can land before the stored session
//! has been restored.

#[cfg(test)]
#[path = "boost_success_test.rs"]
mod boost_success_test;

use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::config::ApiConfig;
use crate::net::error::ApiError;
use crate::net::types::BoostConfirmation;
use crate::state::session_store::SessionStore;
use crate::util::format::date_part;

pub(crate) const SESSION_ID_PARAM: &str = "session_id";
pub(crate) const MISSING_SESSION_MESSAGE: &str = "Missing payment session. Please contact support if you were charged.";

/// Outcome of verifying a boost checkout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BoostStatus {
    Verifying,
    Confirmed { listing_id: String, boosted_until: Option<String> },
    Failed(String),
}

impl BoostStatus {
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    pub(crate) fn from_result(result: Result<BoostConfirmation, ApiError>) -> Self {
        match result {
            Ok(confirmation) => {
                Self::Confirmed { listing_id: confirmation.listing_id, boosted_until: confirmation.boosted_until }
            }
            Err(e) => Self::Failed(e.to_string()),
        }
    }

    pub(crate) fn message(&self) -> String {
        match self {
            Self::Verifying => "Confirming your payment...".to_owned(),
            Self::Confirmed { boosted_until: Some(until), .. } => {
                format!("Your listing is featured until {}.", date_part(until))
            }
            Self::Confirmed { boosted_until: None, .. } => "Your listing is now featured.".to_owned(),
            Self::Failed(message) => message.clone(),
        }
    }
}

/// Validate the `session_id` query value before any network call.
pub(crate) fn validate_session_id(raw: Option<&str>) -> Result<String, &'static str> {
    raw.map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_owned)
        .ok_or(MISSING_SESSION_MESSAGE)
}

#[component]
pub fn BoostSuccessPage() -> impl IntoView {
    let store = expect_context::<SessionStore>();
    let config = expect_context::<ApiConfig>();
    let query = use_query_map();
    let status = RwSignal::new(BoostStatus::Verifying);

    match validate_session_id(query.with_untracked(|q| q.get(SESSION_ID_PARAM)).as_deref()) {
        Err(message) => status.set(BoostStatus::Failed(message.to_owned())),
        Ok(session_id) => {
            #[cfg(feature = "hydrate")]
            leptos::task::spawn_local(async move {
                let token = store.snapshot().token;
                let result = crate::net::api::verify_boost_session(&config, &session_id, token.as_deref()).await;
                if let Err(e) = &result {
                    log::warn!("boost: verification of {session_id} failed: {e}");
                }
                status.set(BoostStatus::from_result(result));
            });
            #[cfg(not(feature = "hydrate"))]
            {
                let _ = (&store, &config, session_id);
            }
        }
    }

    let listing_href = move || match status.get() {
        BoostStatus::Confirmed { listing_id, .. } => Some(format!("/listings/{listing_id}")),
        _ => None,
    };

    view! {
        <div class="boost-page">
            <h1>
                {move || match status.get() {
                    BoostStatus::Verifying => "Processing payment",
                    BoostStatus::Confirmed { .. } => "Boost activated",
                    BoostStatus::Failed(_) => "Payment not confirmed",
                }}
            </h1>
            <p
                class="boost-page__message"
                class:boost-page__message--error=move || matches!(status.get(), BoostStatus::Failed(_))
            >
                {move || status.get().message()}
            </p>
            <p class="boost-page__links">
                {move || listing_href().map(|href| view! { <a href=href>"View listing"</a> " · " })}
                <a href="/dashboard">"Go to dashboard"</a>
            </p>
        </div>
    }
}
