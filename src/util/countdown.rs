//! Auction countdown math.
//!
//! The "live" auction display is a client-side timer: it re-derives the
//! remaining time from the listing's stored end timestamp every tick. There
//! is no server push; a reload simply recomputes from the same timestamp.

#[cfg(test)]
#[path = "countdown_test.rs"]
mod countdown_test;

pub const ENDED_LABEL: &str = "Auction ended";

/// Time left until an auction closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Ended,
    Remaining { days: u64, hours: u64, minutes: u64, seconds: u64 },
}

/// Compute the countdown from epoch-millisecond timestamps.
#[must_use]
pub fn countdown(end_ms: i64, now_ms: i64) -> Countdown {
    let Ok(left_ms) = u64::try_from(end_ms.saturating_sub(now_ms)) else {
        return Countdown::Ended;
    };
    let total_secs = left_ms / 1000;
    if total_secs == 0 {
        return Countdown::Ended;
    }
    Countdown::Remaining {
        days: total_secs / 86_400,
        hours: (total_secs % 86_400) / 3_600,
        minutes: (total_secs % 3_600) / 60,
        seconds: total_secs % 60,
    }
}

impl Countdown {
    #[must_use]
    pub fn is_ended(self) -> bool {
        matches!(self, Self::Ended)
    }

    /// `"2d 03h 04m 05s"`, `"03h 04m 05s"` under a day, or [`ENDED_LABEL`].
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Ended => ENDED_LABEL.to_owned(),
            Self::Remaining { days: 0, hours, minutes, seconds } => {
                format!("{hours:02}h {minutes:02}m {seconds:02}s")
            }
            Self::Remaining { days, hours, minutes, seconds } => {
                format!("{days}d {hours:02}h {minutes:02}m {seconds:02}s")
            }
        }
    }

    /// Under an hour left; the UI highlights these.
    #[must_use]
    pub fn is_ending_soon(self) -> bool {
        matches!(self, Self::Remaining { days: 0, hours: 0, .. })
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_ms() -> i64 {
    #[cfg(feature = "hydrate")]
    {
        #[allow(clippy::cast_possible_truncation)]
        let now = js_sys::Date::now() as i64;
        now
    }
    #[cfg(not(feature = "hydrate"))]
    {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
    }
}
