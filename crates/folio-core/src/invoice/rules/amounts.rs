//! Amount parsing for invoice numbers written with thousands commas.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse an amount such as `1,234.50`, `100.` or `25`.
///
/// Thousands commas are removed and a dangling decimal point is ignored.
/// Returns `None` for anything that is not a plain non-negative decimal
/// afterwards (e.g. a lone comma).
pub fn parse_amount(s: &str) -> Option<Decimal> {
    let cleaned = s.trim().replace(',', "");
    let cleaned = cleaned.strip_suffix('.').unwrap_or(&cleaned);

    if cleaned.is_empty() || !cleaned.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    Decimal::from_str(cleaned).ok()
}

/// Numeric value of a declared header amount; absent or unparsable reads as zero.
pub fn amount_or_zero(s: Option<&str>) -> Decimal {
    s.and_then(parse_amount).unwrap_or(Decimal::ZERO)
}
