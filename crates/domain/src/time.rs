//! Time and timestamp helpers.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// UTC timestamp used for `created_at`, `decided_at`, score times, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Return the current UTC calendar date.
#[must_use]
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Full years elapsed between `date_of_birth` and `on`.
///
/// Returns `0` when `on` precedes the birth date.
#[must_use]
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> u32 {
    if on < date_of_birth {
        return 0;
    }
    let mut years = on.year() - date_of_birth.year();
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_not_count_year_before_birthday() {
        assert_eq!(age_on(date(2010, 6, 15), date(2020, 6, 14)), 9);
        assert_eq!(age_on(date(2010, 6, 15), date(2020, 6, 15)), 10);
    }

    #[test]
    fn should_handle_leap_day_birthdays() {
        assert_eq!(age_on(date(2008, 2, 29), date(2026, 2, 28)), 17);
        assert_eq!(age_on(date(2008, 2, 29), date(2026, 3, 1)), 18);
    }

    #[test]
    fn should_clamp_to_zero_before_birth() {
        assert_eq!(age_on(date(2030, 1, 1), date(2020, 1, 1)), 0);
    }
}
