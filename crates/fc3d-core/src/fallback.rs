//! Placeholder record for runs where no source produced data.

use chrono::NaiveDateTime;
use tracing::warn;

use crate::draw::{DrawError, DrawResult};
use crate::period;

/// Digits carried by the placeholder record.
pub const PLACEHOLDER_NUMBERS: [u8; 3] = [0, 0, 0];

/// Build the degraded record for `now`.
///
/// The period is computed offline from the date of `now`; `reason` becomes
/// the record's note. Fails only for dates outside four-digit years.
pub fn degraded_record(now: NaiveDateTime, reason: &str) -> Result<DrawResult, DrawError> {
    let today = now.date();
    let period = period::current_period(today);
    warn!(period = %period, reason, "synthesizing degraded record");

    Ok(DrawResult::new(period, PLACEHOLDER_NUMBERS, today)?
        .with_note(format!("数据获取失败: {reason}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::DrawType;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 9, 8)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn placeholder_fields() {
        let rec = degraded_record(now(), "all sources failed").unwrap();
        assert_eq!(rec.period(), "2025251");
        assert_eq!(rec.numbers(), [0, 0, 0]);
        assert_eq!(rec.date(), now().date());
        assert_eq!(rec.sum(), 0);
        assert_eq!(rec.span(), 0);
        assert_eq!(rec.draw_type(), DrawType::Triple);
        assert!(rec.note().unwrap().contains("all sources failed"));
        assert!(rec.is_degraded());
    }

    #[test]
    fn deterministic_for_injected_clock() {
        assert_eq!(
            degraded_record(now(), "x").unwrap(),
            degraded_record(now(), "x").unwrap()
        );
    }

    #[test]
    fn five_digit_year_rejected() {
        let far = NaiveDate::from_ymd_opt(10_000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(matches!(
            degraded_record(far, "x"),
            Err(DrawError::InvalidPeriod(_))
        ));
    }
}
