//! REST API helpers for the marketplace backend.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR) and native tests: stubs returning
//! [`ApiError::Unavailable`] since these endpoints are only meaningful in the
//! browser.
//!
//! ERROR HANDLING
//! ==============
//! Every response goes through [`parse_response`], which maps the backend's
//! `{success, message, data}` envelope onto [`ApiError`]. Callers never see
//! raw status codes unless the body carried nothing better.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use super::types::{ApiEnvelope, BoostConfirmation, Credentials, Listing, LoginData, SignupPayload, User};
use crate::config::ApiConfig;

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed";
pub const SIGNUP_FAILED_MESSAGE: &str = "Signup failed";
pub const REQUEST_FAILED_MESSAGE: &str = "Request failed";
pub const BOOST_VERIFY_FAILED_MESSAGE: &str = "Payment verification failed";

#[cfg(any(test, feature = "hydrate"))]
pub(crate) const LOGIN_ENDPOINT: &str = "/user/login";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const CREATE_USER_ENDPOINT: &str = "/user/create";
#[cfg(any(test, feature = "hydrate"))]
pub(crate) const LISTINGS_ENDPOINT: &str = "/listing";

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn user_endpoint(user_id: &str) -> String {
    format!("/user/{user_id}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn listing_endpoint(listing_id: &str) -> String {
    format!("/listing/{listing_id}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn seller_listings_endpoint(seller_id: &str) -> String {
    format!("/listing/user/{seller_id}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn boost_verify_endpoint(session_id: &str) -> String {
    format!("/payment/verify-session/{session_id}")
}

#[cfg(any(test, feature = "hydrate"))]
pub(crate) fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Classify a response body into its `data` payload or an [`ApiError`].
///
/// A body that declares `success: false`, or any parseable body on a non-2xx
/// status, becomes [`ApiError::Rejected`] carrying the server message (or
/// `fallback` when the server sent none). Unparseable bodies become
/// [`ApiError::Status`] on failure statuses and [`ApiError::Decode`] otherwise.
///
/// # Errors
///
/// Returns the classified failure as described above.
pub fn parse_response<T: DeserializeOwned>(
    status: u16,
    ok: bool,
    body: &str,
    fallback: &str,
) -> Result<Option<T>, ApiError> {
    classify(status, ok, body, fallback, |success| success != Some(false))
}

/// Like [`parse_response`] but the body must declare `success: true`. Used
/// by the auth mutations, where a missing flag is not an acceptance.
///
/// # Errors
///
/// Returns [`ApiError::Rejected`] for any body without `success: true`, plus
/// the failures of [`parse_response`].
pub fn parse_response_strict<T: DeserializeOwned>(
    status: u16,
    ok: bool,
    body: &str,
    fallback: &str,
) -> Result<Option<T>, ApiError> {
    classify(status, ok, body, fallback, |success| success == Some(true))
}

/// Like [`parse_response`] but the `data` member is mandatory.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when a successful body has no `data`.
pub fn parse_data<T: DeserializeOwned>(status: u16, ok: bool, body: &str, fallback: &str) -> Result<T, ApiError> {
    parse_response(status, ok, body, fallback)?.ok_or_else(missing_data)
}

/// [`parse_response_strict`] with a mandatory `data` member.
///
/// # Errors
///
/// Returns [`ApiError::Decode`] when an accepted body has no `data`.
pub fn parse_data_strict<T: DeserializeOwned>(status: u16, ok: bool, body: &str, fallback: &str) -> Result<T, ApiError> {
    parse_response_strict(status, ok, body, fallback)?.ok_or_else(missing_data)
}

fn classify<T: DeserializeOwned>(
    status: u16,
    ok: bool,
    body: &str,
    fallback: &str,
    accepts: impl Fn(Option<bool>) -> bool,
) -> Result<Option<T>, ApiError> {
    match serde_json::from_str::<ApiEnvelope<T>>(body) {
        Ok(envelope) if ok && accepts(envelope.success) => Ok(envelope.data),
        Ok(envelope) => {
            let message = envelope
                .message
                .map(|m| m.trim().to_owned())
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_owned());
            Err(ApiError::Rejected(message))
        }
        Err(e) if !ok => {
            log::debug!("unreadable body on status {status}: {e}");
            Err(ApiError::Status { status, message: fallback.to_owned() })
        }
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}

fn missing_data() -> ApiError {
    ApiError::Decode("response has no data".to_owned())
}

#[cfg(feature = "hydrate")]
async fn send(request: Result<gloo_net::http::Request, gloo_net::Error>) -> Result<(u16, bool, String), ApiError> {
    let request = request.map_err(|e| ApiError::Network(e.to_string()))?;
    let resp = request.send().await.map_err(|e| ApiError::Network(e.to_string()))?;
    let status = resp.status();
    let ok = resp.ok();
    let body = resp.text().await.map_err(|e| ApiError::Network(e.to_string()))?;
    Ok((status, ok, body))
}

#[cfg(feature = "hydrate")]
fn get(url: &str, token: Option<&str>) -> Result<gloo_net::http::Request, gloo_net::Error> {
    let mut builder = gloo_net::http::Request::get(url);
    if let Some(token) = token {
        builder = builder.header("Authorization", &bearer(token));
    }
    builder.build()
}

// =============================================================================
// AUTH
// =============================================================================

/// Authentication calls used by the session store. Enables mocking in tests.
///
/// Futures are `?Send`: in the browser they run on the single UI thread via
/// `spawn_local`.
#[async_trait(?Send)]
pub trait AuthApi: Send + Sync {
    /// `POST /user/login`.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures, non-2xx statuses,
    /// `success: false` bodies, or bodies without `data`.
    async fn login(&self, credentials: &Credentials) -> Result<LoginData, ApiError>;

    /// `POST /user/create`. Success does not authenticate.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] for transport failures or rejected signups.
    async fn create_user(&self, payload: &SignupPayload) -> Result<(), ApiError>;

    /// `GET /user/{id}` with the bearer token.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the user record cannot be fetched.
    async fn fetch_user(&self, user_id: &str, token: &str) -> Result<User, ApiError>;
}

/// [`AuthApi`] backed by the real REST backend.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    config: ApiConfig,
}

impl HttpAuthApi {
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

#[async_trait(?Send)]
impl AuthApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginData, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.endpoint(LOGIN_ENDPOINT);
            let (status, ok, body) = send(gloo_net::http::Request::post(&url).json(credentials)).await?;
            parse_data_strict(status, ok, &body, LOGIN_FAILED_MESSAGE)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = credentials;
            Err(ApiError::Unavailable)
        }
    }

    async fn create_user(&self, payload: &SignupPayload) -> Result<(), ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.endpoint(CREATE_USER_ENDPOINT);
            let (status, ok, body) = send(gloo_net::http::Request::post(&url).json(payload)).await?;
            parse_response_strict::<serde_json::Value>(status, ok, &body, SIGNUP_FAILED_MESSAGE)?;
            Ok(())
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = payload;
            Err(ApiError::Unavailable)
        }
    }

    async fn fetch_user(&self, user_id: &str, token: &str) -> Result<User, ApiError> {
        #[cfg(feature = "hydrate")]
        {
            let url = self.config.endpoint(&user_endpoint(user_id));
            let (status, ok, body) = send(get(&url, Some(token))).await?;
            parse_data(status, ok, &body, REQUEST_FAILED_MESSAGE)
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (user_id, token);
            Err(ApiError::Unavailable)
        }
    }
}

// =============================================================================
// LISTINGS
// =============================================================================

/// Fetch the public listing catalogue from `GET /listing`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails or the body is malformed.
pub async fn fetch_listings(config: &ApiConfig) -> Result<Vec<Listing>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = config.endpoint(LISTINGS_ENDPOINT);
        let (status, ok, body) = send(get(&url, None)).await?;
        Ok(parse_response(status, ok, &body, REQUEST_FAILED_MESSAGE)?.unwrap_or_default())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = config;
        Err(ApiError::Unavailable)
    }
}

/// Fetch one listing from `GET /listing/{id}`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the listing cannot be fetched.
pub async fn fetch_listing(config: &ApiConfig, listing_id: &str) -> Result<Listing, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = config.endpoint(&listing_endpoint(listing_id));
        let (status, ok, body) = send(get(&url, None)).await?;
        parse_data(status, ok, &body, REQUEST_FAILED_MESSAGE)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, listing_id);
        Err(ApiError::Unavailable)
    }
}

/// Fetch the signed-in seller's own listings from `GET /listing/user/{id}`.
///
/// # Errors
///
/// Returns an [`ApiError`] if the request fails or the body is malformed.
pub async fn fetch_seller_listings(config: &ApiConfig, seller_id: &str, token: &str) -> Result<Vec<Listing>, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = config.endpoint(&seller_listings_endpoint(seller_id));
        let (status, ok, body) = send(get(&url, Some(token))).await?;
        Ok(parse_response(status, ok, &body, REQUEST_FAILED_MESSAGE)?.unwrap_or_default())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, seller_id, token);
        Err(ApiError::Unavailable)
    }
}

/// Confirm a boost checkout with `GET /payment/verify-session/{session_id}`.
///
/// The payment itself happens at the external provider; this only asks the
/// backend whether that checkout session completed.
///
/// # Errors
///
/// Returns an [`ApiError`] if verification fails or the session is unpaid.
pub async fn verify_boost_session(
    config: &ApiConfig,
    session_id: &str,
    token: Option<&str>,
) -> Result<BoostConfirmation, ApiError> {
    #[cfg(feature = "hydrate")]
    {
        let url = config.endpoint(&boost_verify_endpoint(session_id));
        let (status, ok, body) = send(get(&url, token)).await?;
        parse_data(status, ok, &body, BOOST_VERIFY_FAILED_MESSAGE)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (config, session_id, token);
        Err(ApiError::Unavailable)
    }
}
