//! Draw period identifiers.
//!
//! A period is a fixed-width 7-character code `YYYYDDD`: a four-digit year
//! followed by a zero-padded three-digit day-of-year. Because both parts are
//! fixed-width and left-padded, comparing two periods as strings gives their
//! chronological order, so `"2025009" < "2025010" < "2026001"`.
//!
//! The same encoding is used to recover a draw date when a source publishes
//! only the period, and to compute the offline placeholder period for the
//! degraded record.

use chrono::{Datelike, Days, NaiveDate};

/// Width of a period identifier.
pub const PERIOD_LEN: usize = 7;

/// Width of the two-digit-year form, e.g. `25242`.
pub const SHORT_PERIOD_LEN: usize = 5;

/// True when `s` is exactly seven ASCII digits.
pub fn is_valid(s: &str) -> bool {
    s.len() == PERIOD_LEN && s.bytes().all(|b| b.is_ascii_digit())
}

/// Extract a period from text that may carry decoration, such as
/// `"第2025242期"` or `" 2025242 "`.
///
/// The first run of digits is used. Seven digits are taken as-is; five
/// digits are the short `YYDDD` form some sites print and get the `20`
/// century prefix.
pub fn extract(s: &str) -> Option<String> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits: String = s[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    match digits.len() {
        PERIOD_LEN => Some(digits),
        SHORT_PERIOD_LEN => Some(format!("20{digits}")),
        _ => None,
    }
}

/// Split a period into `(year, day_of_year)`.
pub fn split(period: &str) -> Option<(i32, u32)> {
    if !is_valid(period) {
        return None;
    }
    let year: i32 = period[..4].parse().ok()?;
    let day: u32 = period[4..].parse().ok()?;
    Some((year, day))
}

/// Calendar date encoded by a period: January 1 of the year plus
/// `day_of_year - 1` days.
///
/// Returns `None` for day 0 or a day past the end of that year.
pub fn date_from_period(period: &str) -> Option<NaiveDate> {
    let (year, day) = split(period)?;
    if day == 0 {
        return None;
    }
    let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let date = jan1.checked_add_days(Days::new(u64::from(day - 1)))?;
    (date.year() == year).then_some(date)
}

/// Period identifier for `date`, counting elapsed days since January 1 of
/// the same year. Needs no network access.
pub fn current_period(date: NaiveDate) -> String {
    format!("{:04}{:03}", date.year(), date.ordinal())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn validity() {
        assert!(is_valid("2025242"));
        assert!(!is_valid("202524"));
        assert!(!is_valid("20252420"));
        assert!(!is_valid("2025a42"));
        assert!(!is_valid(""));
    }

    #[test]
    fn extract_from_decorated_text() {
        assert_eq!(extract("第2025242期").as_deref(), Some("2025242"));
        assert_eq!(extract("  2025001 ").as_deref(), Some("2025001"));
        assert_eq!(extract("25242").as_deref(), Some("2025242"));
        assert_eq!(extract("2524"), None);
        assert_eq!(extract("202524"), None);
        assert_eq!(extract("no digits"), None);
    }

    #[test]
    fn date_derivation() {
        assert_eq!(date_from_period("2025001"), Some(date(2025, 1, 1)));
        assert_eq!(date_from_period("2025242"), Some(date(2025, 8, 30)));
        assert_eq!(date_from_period("2024366"), Some(date(2024, 12, 31)));
        assert_eq!(date_from_period("2025365"), Some(date(2025, 12, 31)));
    }

    #[test]
    fn date_derivation_rejects_out_of_year() {
        assert_eq!(date_from_period("2025000"), None);
        assert_eq!(date_from_period("2025366"), None);
        assert_eq!(date_from_period("2025999"), None);
        assert_eq!(date_from_period("abc"), None);
    }

    #[test]
    fn current_period_round_trips() {
        for d in [date(2025, 1, 1), date(2025, 8, 30), date(2024, 12, 31)] {
            let p = current_period(d);
            assert_eq!(p.len(), PERIOD_LEN);
            assert_eq!(date_from_period(&p), Some(d));
        }
        assert_eq!(current_period(date(2025, 1, 9)), "2025009");
    }

    #[test]
    fn lexicographic_order_is_chronological() {
        let mut periods = vec![
            current_period(date(2026, 1, 1)),
            current_period(date(2025, 1, 10)),
            current_period(date(2025, 1, 9)),
            current_period(date(2025, 12, 31)),
        ];
        periods.sort();
        assert_eq!(periods, ["2025009", "2025010", "2025365", "2026001"]);
    }
}
