//! Fee billing schedule.

use crate::{Error, Result};
use chrono::{Days, NaiveDate};

/// Date of the next billing run, `cycle_days` after `from`.
pub fn next_billing_date(from: NaiveDate, cycle_days: u32) -> Result<NaiveDate> {
    if cycle_days == 0 {
        return Err(Error::InvalidInput(
            "billing cycle must be at least one day".to_string(),
        ));
    }

    from.checked_add_days(Days::new(u64::from(cycle_days)))
        .ok_or_else(|| Error::InvalidDate(format!("{from} + {cycle_days} days is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_billing_date() {
        let from = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let next = next_billing_date(from, 30).unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 11, 18).unwrap());
    }

    #[test]
    fn test_next_billing_date_crosses_year() {
        let from = NaiveDate::from_ymd_opt(2026, 12, 15).unwrap();
        let next = next_billing_date(from, 30).unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2027, 1, 14).unwrap());
    }

    #[test]
    fn test_zero_cycle_rejected() {
        let from = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert!(matches!(
            next_billing_date(from, 0),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(
            next_billing_date(NaiveDate::MAX, 1),
            Err(Error::InvalidDate(_))
        ));
    }
}
