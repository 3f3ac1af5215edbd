//! # Display Formatting
//!
//! Every monetary figure is USD, shown with thousands separators and no
//! decimals (`U$D 120,000`). The engine carries raw numbers end to end and
//! only formats at the output boundary; [`parse_usd`] exists for callers that
//! receive already-formatted figures (stored quotes, email payloads) and need
//! the number back.
//!
//! Formatting a NaN or infinite amount is an error, never a silent `0`.

use chrono::NaiveDate;

use crate::errors::{QuoteError, QuoteResult};
use crate::units::Months;

/// Currency prefix used on every formatted amount
pub const CURRENCY_PREFIX: &str = "U$D";

/// Date format for quote and expiry dates (day/month/year)
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Format a USD amount as `U$D 1,234,567`.
///
/// Rounds half away from zero to whole dollars.
///
/// # Example
///
/// ```rust
/// use quote_core::format::format_usd;
///
/// assert_eq!(format_usd(156_000.0).unwrap(), "U$D 156,000");
/// assert_eq!(format_usd(999.5).unwrap(), "U$D 1,000");
/// assert!(format_usd(f64::NAN).is_err());
/// ```
pub fn format_usd(amount: f64) -> QuoteResult<String> {
    if !amount.is_finite() {
        return Err(QuoteError::non_finite("amount", amount));
    }

    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());
    let sign = if rounded < 0.0 { "-" } else { "" };

    Ok(format!("{} {}{}", CURRENCY_PREFIX, sign, group_thousands(&digits)))
}

/// Parse a formatted USD amount back into a number.
///
/// Accepts the `U$D` prefix (optional) and comma thousands separators.
/// Anything that is not a finite number is a [`QuoteError::Formatting`].
///
/// # Example
///
/// ```rust
/// use quote_core::format::parse_usd;
///
/// assert_eq!(parse_usd("U$D 181,000").unwrap(), 181_000.0);
/// assert_eq!(parse_usd("2,500").unwrap(), 2_500.0);
/// assert!(parse_usd("U$D N/A").is_err());
/// ```
pub fn parse_usd(input: &str) -> QuoteResult<f64> {
    let trimmed = input.trim();
    let body = trimmed
        .strip_prefix(CURRENCY_PREFIX)
        .unwrap_or(trimmed)
        .trim();

    if body.is_empty() {
        return Err(QuoteError::formatting(input, "no amount present"));
    }

    let cleaned: String = body.chars().filter(|c| *c != ',').collect();
    if !cleaned
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    {
        return Err(QuoteError::formatting(input, "unexpected characters in amount"));
    }

    let value: f64 = cleaned
        .parse()
        .map_err(|e: std::num::ParseFloatError| QuoteError::formatting(input, e.to_string()))?;

    if !value.is_finite() {
        return Err(QuoteError::formatting(input, "amount is not finite"));
    }
    Ok(value)
}

/// Format a unit price as `U$D 1,200/m²`.
pub fn format_rate_per_m2(price_per_m2: f64) -> QuoteResult<String> {
    Ok(format!("{}/m²", format_usd(price_per_m2)?))
}

/// Format a multiplier with one decimal, e.g. `1.3x`.
pub fn format_multiplier(multiplier: f64) -> String {
    format!("{:.1}x", multiplier)
}

/// Format an area, e.g. `100 m²` or `87.5 m²`.
pub fn format_area(area_m2: f64) -> String {
    format!("{} m²", trim_number(area_m2))
}

/// Format a share (0.0 - 1.0) as a whole percentage, e.g. `40%`.
pub fn format_percent(share: f64) -> String {
    format!("{:.0}%", share * 100.0)
}

/// Format a duration, e.g. `1 month`, `1.5 months`, `3 months`.
pub fn format_months(months: Months) -> String {
    let suffix = if months.0 > 1.0 { "s" } else { "" };
    format!("{} month{}", trim_number(months.0), suffix)
}

/// Format a date as `dd/mm/YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Turn a raw key into a display label: `-`/`_` become spaces and each word
/// is title-cased (`tierra-del_fuego` -> `Tierra Del Fuego`).
pub fn title_case_key(key: &str) -> String {
    key.replace(['-', '_'], " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(|c| c.to_lowercase()))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whole numbers without a trailing `.0`, everything else as-is
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Insert `,` every three digits from the right
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
