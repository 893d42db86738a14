//! Listing catalogue state for the home and dashboard views.
//!
//! DESIGN
//! ======
//! Fetching is page-driven; this module only holds the result and the pure
//! ordering/filtering applied before rendering.

#[cfg(test)]
#[path = "listings_test.rs"]
mod listings_test;

use crate::net::error::ApiError;
use crate::net::types::Listing;

/// Fetched listings plus request status.
#[derive(Clone, Debug, Default)]
pub struct ListingsState {
    pub items: Vec<Listing>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ListingsState {
    /// State for a view whose fetch is about to start.
    #[must_use]
    pub fn pending() -> Self {
        Self { loading: true, ..Self::default() }
    }

    /// Record the outcome of a fetch. A failure keeps previously loaded items.
    pub fn settle(&mut self, result: Result<Vec<Listing>, ApiError>) {
        self.loading = false;
        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
            }
            Err(e) => {
                log::warn!("listings: fetch failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    /// Items matching `query` (case-insensitive title/category substring),
    /// boosted listings first, otherwise in fetch order.
    #[must_use]
    pub fn visible(&self, query: &str) -> Vec<Listing> {
        let needle = query.trim().to_lowercase();
        let mut items: Vec<Listing> = self
            .items
            .iter()
            .filter(|listing| needle.is_empty() || matches_query(listing, &needle))
            .cloned()
            .collect();
        items.sort_by_key(|listing| !listing.is_boosted);
        items
    }
}

fn matches_query(listing: &Listing, needle: &str) -> bool {
    listing.title.to_lowercase().contains(needle)
        || listing
            .category
            .as_deref()
            .is_some_and(|category| category.to_lowercase().contains(needle))
}
