//! Wire DTOs for the marketplace REST API.
//!
//! DESIGN
//! ======
//! Field names follow the backend's camelCase JSON. Unknown fields are
//! ignored so backend additions never break deserialization, and document
//! ids are accepted as either `id` or `_id`.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub const DEFAULT_PREFERRED_LANGUAGE: &str = "en";
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Standard response wrapper used by every backend endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: Option<bool>,
    pub message: Option<String>,
    pub data: Option<T>,
}

/// The authenticated identity. Only `id` is required by the session core.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

impl User {
    /// Best human-readable label: full name, then username, email, id.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        self.username
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_else(|| self.id.clone())
    }
}

/// Login form payload for `POST /user/login`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// `data` member of a successful login response.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LoginData {
    pub user: User,
    pub token: String,
}

/// Fields collected by the signup form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Body for `POST /user/create`: the form plus derived fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupPayload {
    #[serde(flatten)]
    pub form: SignupForm,
    pub username: String,
    pub preferred_language: String,
}

impl SignupPayload {
    /// Attach the handle derived from the email and the default locale.
    #[must_use]
    pub fn from_form(form: SignupForm) -> Self {
        let username = derive_username(&form.email);
        Self { form, username, preferred_language: DEFAULT_PREFERRED_LANGUAGE.to_owned() }
    }
}

/// Derive an account handle from an email: lowercased, keeping only
/// `[a-z0-9_]`.
#[must_use]
pub fn derive_username(email: &str) -> String {
    email
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_')
        .collect()
}

/// A marketplace listing as returned by `/listing` endpoints.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub seller_id: Option<String>,
    #[serde(default)]
    pub is_auction: bool,
    /// Auction close time in milliseconds since the Unix epoch.
    #[serde(default)]
    pub auction_ends_at: Option<i64>,
    #[serde(default)]
    pub current_bid: Option<f64>,
    #[serde(default)]
    pub is_boosted: bool,
}

impl Listing {
    /// Price to headline: the current bid for auctions that have one.
    #[must_use]
    pub fn display_amount(&self) -> f64 {
        if self.is_auction {
            self.current_bid.unwrap_or(self.price)
        } else {
            self.price
        }
    }

    /// Caption shown next to [`Listing::display_amount`].
    #[must_use]
    pub fn price_caption(&self) -> &'static str {
        if self.is_auction && self.current_bid.is_some() { "Current bid" } else { "Price" }
    }

    #[must_use]
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_owned()
}

/// `data` member of a verified boost checkout.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoostConfirmation {
    pub listing_id: String,
    #[serde(default)]
    pub boosted_until: Option<String>,
}
