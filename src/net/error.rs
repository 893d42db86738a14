//! Failure taxonomy for REST calls.
//!
//! ERROR HANDLING
//! ==============
//! `Display` output is user-facing: the session store mirrors it into its
//! `error` field and forms render it verbatim. Transport details are kept in
//! the variant payload for logging but never shown.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// Errors produced by marketplace API calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response (offline, CORS, DNS, ...).
    #[error("Network error. Please try again.")]
    Network(String),

    /// The server answered with a non-success status and no usable body.
    /// `message` is the calling operation's fallback.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The server rejected the request with an application message.
    #[error("{0}")]
    Rejected(String),

    /// The response body did not match the expected schema.
    #[error("Unexpected response from server")]
    Decode(String),

    /// Browser-only call attempted outside the browser.
    #[error("not available on server")]
    Unavailable,
}

impl ApiError {
    /// `true` when the failure came from the transport rather than the server.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}
