//! # Money Module
//!
//! Display-side helpers for prices scraped from, and written back to, a
//! storefront page.
//!
//! ## Price Text Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Storefront Price Text                                │
//! │                                                                         │
//! │   "  €1.299,00 "                                                        │
//! │        │                                                                │
//! │        ├── currency_symbol()  → '€'                                     │
//! │        │                                                                │
//! │        └── numeric_part()     → "1.299,00"                              │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           parse_amount()      → 1299.0   (None if unparseable)         │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           resolver            → 1390.93                                 │
//! │                 │                                                       │
//! │                 ▼                                                       │
//! │           format_amount()     → "1390.93"                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices stay `f64` end to end. Rounding happens only here, at display
//! time.

/// Symbol used when the price text carries none.
pub const DEFAULT_CURRENCY_SYMBOL: char = '$';

/// Formats an amount with exactly two decimals and no grouping.
///
/// ## Example
/// ```rust
/// use geoprice_core::money::format_amount;
///
/// assert_eq!(format_amount(105.0), "105.00");
/// assert_eq!(format_amount(13.333), "13.33");
/// ```
pub fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

/// Keeps only digits and `.`/`,` separators.
pub fn numeric_part(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == ',')
        .collect()
}

/// First character of the text that is not part of the number.
///
/// Whitespace is skipped, so `"10 €"` yields `'€'`. Falls back to
/// [`DEFAULT_CURRENCY_SYMBOL`].
pub fn currency_symbol(text: &str) -> char {
    text.trim()
        .chars()
        .find(|c| !c.is_ascii_digit() && *c != '.' && *c != ',' && !c.is_whitespace())
        .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
}

/// Parses a scraped price into an amount.
///
/// ## Separators
/// - Both `.` and `,` present: whichever comes last is the decimal
///   separator, the other groups thousands (`1,299.99`, `1.299,99`).
/// - Only `,`: a single comma followed by exactly two digits is a decimal
///   comma (`12,50`); otherwise commas group thousands (`1,299`).
/// - Only `.`: parsed as is.
///
/// Returns `None` for empty, malformed or non-finite input.
pub fn parse_amount(text: &str) -> Option<f64> {
    let raw = numeric_part(text);
    if !raw.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    let last_dot = raw.rfind('.');
    let last_comma = raw.rfind(',');

    let normalized = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) if comma > dot => raw.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => raw.replace(',', ""),
        (None, Some(comma)) => {
            let decimals = raw.len() - comma - 1;
            if raw.matches(',').count() == 1 && decimals == 2 {
                raw.replace(',', ".")
            } else {
                raw.replace(',', "")
            }
        }
        _ => raw,
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|amount| amount.is_finite())
}

// =============================================================================
// Unit Tests
// =============================================================================
