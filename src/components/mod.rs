//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome and listing presentation while reading
//! the session store and API config from Leptos context providers.

pub mod auction_countdown;
pub mod listing_card;
pub mod session_guard;
pub mod site_header;
