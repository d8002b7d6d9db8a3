//! Validation utilities for the Shopbook bookkeeping backend
//!
//! Field-level checks shared between the sale, debt, and reporting
//! surfaces. Services map the `&'static str` messages into the HTTP
//! error taxonomy.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::DateRange;

/// Validate a unit count (pieces purchased or sold)
pub fn validate_pcs(pcs: i32) -> Result<(), &'static str> {
    if pcs <= 0 {
        return Err("Unit count must be positive");
    }
    Ok(())
}

/// Validate a unit price or monetary amount that may legitimately be zero
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a strictly positive monetary amount (repayments, expenses)
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount <= Decimal::ZERO {
        return Err("Amount must be positive");
    }
    Ok(())
}

/// Validate an item or description name
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    Ok(())
}

/// Validate a debt down payment against the sale total
pub fn validate_down_payment(amount_payable_now: Decimal, total_price: Decimal) -> Result<(), &'static str> {
    if amount_payable_now < Decimal::ZERO {
        return Err("Down payment cannot be negative");
    }
    if amount_payable_now > total_price {
        return Err("Down payment cannot exceed the sale total");
    }
    Ok(())
}

/// Parse the day out of a date or date-time string.
///
/// Only the first 10 characters are considered, so `2024-03-05` and
/// `2024-03-05T14:30:00Z` resolve to the same day. Anything that does not
/// lead with an ISO calendar date is rejected.
pub fn parse_day(s: &str) -> Result<NaiveDate, &'static str> {
    let prefix = s.get(..10).ok_or("Date must start with YYYY-MM-DD")?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").map_err(|_| "Date must start with YYYY-MM-DD")
}

/// Resolve an optional report range to concrete inclusive bounds.
///
/// Missing ends default to a window wide enough to cover every record the
/// shop will ever hold.
pub fn parse_range(start: Option<&str>, end: Option<&str>) -> Result<DateRange, &'static str> {
    let start = match start {
        Some(s) => parse_day(s)?,
        None => NaiveDate::from_ymd_opt(2000, 1, 1).expect("valid date"),
    };
    let end = match end {
        Some(s) => parse_day(s)?,
        None => NaiveDate::from_ymd_opt(2100, 12, 31).expect("valid date"),
    };
    if start > end {
        return Err("Start date is after end date");
    }
    Ok(DateRange { start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_bare_dates() {
        assert_eq!(
            parse_day("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn parse_day_accepts_datetime_strings() {
        assert_eq!(
            parse_day("2024-03-05T14:30:00Z").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert_eq!(
            parse_day("2024-03-05 09:00:00").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
    }

    #[test]
    fn parse_day_rejects_garbage() {
        assert!(parse_day("yesterday").is_err());
        assert!(parse_day("2024-3-5").is_err());
        assert!(parse_day("").is_err());
    }

    #[test]
    fn parse_range_defaults_and_rejects_inversion() {
        let range = parse_range(None, None).unwrap();
        assert!(range.start < range.end);

        let range = parse_range(Some("2024-01-01"), Some("2024-06-30")).unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 6, 30).unwrap());

        assert!(parse_range(Some("2024-06-30"), Some("2024-01-01")).is_err());
    }

    #[test]
    fn down_payment_bounds() {
        let total = Decimal::from(1000);
        assert!(validate_down_payment(Decimal::ZERO, total).is_ok());
        assert!(validate_down_payment(total, total).is_ok());
        assert!(validate_down_payment(Decimal::from(1001), total).is_err());
        assert!(validate_down_payment(Decimal::from(-1), total).is_err());
    }
}
