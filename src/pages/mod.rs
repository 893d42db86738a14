//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped orchestration (fetches, form submission,
//! post-action navigation) and delegates rendering details to `components`.
//! Form validation lives beside each page as plain functions so it can be
//! tested without a browser.

pub mod boost_success;
pub mod dashboard;
pub mod forgot_password;
pub mod home;
pub mod legal;
pub mod listing;
pub mod login;
pub mod signup;
pub mod verify_email;
