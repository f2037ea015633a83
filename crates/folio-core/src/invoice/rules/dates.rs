//! Date reading for the captured `date` header field.

use chrono::NaiveDate;

use super::patterns::DATE_DMY;

/// Read a `D/M/Y` or `D-M-Y` date as captured from the invoice.
///
/// Two-digit years are placed in the 2000s up to 50 and the 1900s above.
pub fn parse_dmy_date(s: &str) -> Option<NaiveDate> {
    let caps = DATE_DMY.captures(s.trim())?;

    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    let year = parse_year(&caps[3])?;

    NaiveDate::from_ymd_opt(year, month, day)
}

fn parse_year(s: &str) -> Option<i32> {
    let year: i32 = s.parse().ok()?;
    match s.len() {
        2 if year <= 50 => Some(2000 + year),
        2 => Some(1900 + year),
        4 => Some(year),
        _ => None,
    }
}
