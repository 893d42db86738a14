//! Display formatting for prices and dates shown on listing pages.

#[cfg(test)]
#[path = "format_test.rs"]
mod format_test;

/// Render `amount` as `"EUR 12,500.00"`. Negative amounts keep their sign
/// after the currency code.
#[must_use]
pub fn format_price(amount: f64, currency: &str) -> String {
    if !amount.is_finite() {
        return format!("{currency} —");
    }
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{currency} {sign}{}.{cents}", group_thousands(whole))
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Trim an ISO-8601 timestamp to its date part (`2026-11-01T10:00:00Z` ->
/// `2026-11-01`). Anything else is returned unchanged.
#[must_use]
pub fn date_part(iso: &str) -> &str {
    iso.split_once('T').map_or(iso, |(date, _)| date)
}
