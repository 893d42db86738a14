//! Shared client-side state modules.
//!
//! DESIGN
//! ======
//! `session` is the plain data model, `session_store` owns the actions that
//! mutate it, and `listings` backs the catalogue pages.

pub mod listings;
pub mod session;
pub mod session_store;
