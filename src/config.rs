//! REST API configuration.
//!
//! WASM bundles have no process environment, so the base URL is baked in at
//! build time from `API_BASE_URL` and falls back to the local dev backend.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// Location of the marketplace REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::from_raw(None)
    }
}

impl ApiConfig {
    /// Build config from the `API_BASE_URL` value captured at compile time.
    #[must_use]
    pub fn from_build_env() -> Self {
        Self::from_raw(option_env!("API_BASE_URL"))
    }

    /// Build config from an optional raw base URL. Blank values fall back to
    /// [`DEFAULT_API_BASE_URL`].
    #[must_use]
    pub fn from_raw(raw: Option<&str>) -> Self {
        let base = raw
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_API_BASE_URL);
        Self { base_url: base.trim_end_matches('/').to_owned() }
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
