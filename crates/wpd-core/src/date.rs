//! OLE automation date conversion
//!
//! A DATE payload counts days since 1899-12-30 as an `f64`. The fraction is
//! the time of day and stays positive for dates before the epoch, so
//! -1.25 is 1899-12-29 06:00.

use chrono::{DateTime, NaiveDateTime};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// 1899-12-30 is 25569 days before the Unix epoch
const OA_EPOCH_OFFSET_MS: i64 = 25_569 * MILLIS_PER_DAY;

/// Exclusive bounds of representable OLE dates (years 100 through 9999)
const OA_MIN: f64 = -657_435.0;
const OA_MAX: f64 = 2_958_466.0;

/// Convert an OLE automation date, rounding to the nearest millisecond.
/// Returns `None` for NaN or out-of-range input.
pub fn from_oa_date(value: f64) -> Option<NaiveDateTime> {
    if !(value > OA_MIN && value < OA_MAX) {
        return None;
    }

    let half = if value >= 0.0 { 0.5 } else { -0.5 };
    let mut millis = (value * MILLIS_PER_DAY as f64 + half) as i64;
    if millis < 0 {
        millis -= (millis % MILLIS_PER_DAY) * 2;
    }

    DateTime::from_timestamp_millis(millis - OA_EPOCH_OFFSET_MS).map(|dt| dt.naive_utc())
}

/// Convert to an OLE automation date at millisecond resolution
pub fn to_oa_date(value: NaiveDateTime) -> f64 {
    let mut millis = value.and_utc().timestamp_millis() + OA_EPOCH_OFFSET_MS;
    if millis < 0 {
        let frac = millis % MILLIS_PER_DAY;
        if frac != 0 {
            millis -= (MILLIS_PER_DAY + frac) * 2;
        }
    }
    millis as f64 / MILLIS_PER_DAY as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_epoch() {
        assert_eq!(to_oa_date(at(1899, 12, 30, 0, 0, 0)), 0.0);
        assert_eq!(from_oa_date(0.0), Some(at(1899, 12, 30, 0, 0, 0)));
    }

    #[test]
    fn test_known_values() {
        assert_eq!(to_oa_date(at(2000, 1, 1, 12, 0, 0)), 36526.5);
        assert_eq!(from_oa_date(36526.5), Some(at(2000, 1, 1, 12, 0, 0)));
    }

    #[test]
    fn test_negative_dates_keep_positive_fraction() {
        assert_eq!(to_oa_date(at(1899, 12, 29, 6, 0, 0)), -1.25);
        assert_eq!(from_oa_date(-1.25), Some(at(1899, 12, 29, 6, 0, 0)));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(from_oa_date(f64::NAN), None);
        assert_eq!(from_oa_date(3_000_000.0), None);
        assert_eq!(from_oa_date(-700_000.0), None);
    }
}
