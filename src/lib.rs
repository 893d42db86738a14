//! # auction-ui
//!
//! Leptos + WASM frontend for the luxury-goods auction marketplace.
//!
//! This crate contains pages, components, the persisted session store, the
//! route guard, and thin REST helpers for the external marketplace API. The
//! backend itself lives elsewhere; everything here is browser-side.

pub mod app;
pub mod components;
pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: install browser logging and hydrate the server-rendered
/// shell.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    leptos::mount::hydrate_body(app::App);
}
