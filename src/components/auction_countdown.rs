//! Live auction countdown badge.

use leptos::prelude::*;

use crate::util::countdown::{countdown, now_ms};

/// Remaining-time badge for an auction ending at `ends_at` (epoch ms).
/// Ticks once per second in the browser.
#[component]
pub fn AuctionCountdown(ends_at: i64) -> impl IntoView {
    let now = RwSignal::new(now_ms());

    #[cfg(feature = "hydrate")]
    {
        let alive = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(true));
        let alive_task = alive.clone();
        leptos::task::spawn_local(async move {
            loop {
                gloo_timers::future::sleep(std::time::Duration::from_secs(1)).await;
                if !alive_task.load(std::sync::atomic::Ordering::Relaxed) {
                    break;
                }
                now.set(now_ms());
                if countdown(ends_at, now.get_untracked()).is_ended() {
                    break;
                }
            }
        });
        on_cleanup(move || alive.store(false, std::sync::atomic::Ordering::Relaxed));
    }

    let remaining = move || countdown(ends_at, now.get());

    view! {
        <span
            class="auction-countdown"
            class:auction-countdown--soon=move || remaining().is_ending_soon()
            class:auction-countdown--ended=move || remaining().is_ended()
        >
            {move || remaining().label()}
        </span>
    }
}
