//! Calendar arithmetic for billing.
//!
//! Dates are plain calendar dates (`NaiveDate`); the billing boundary and the
//! installment schedule never depend on time of day.

use chrono::{DateTime, Datelike, Months, NaiveDate};

use super::errors::{BillingError, BillingResult};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a wire date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, in which
/// case the calendar date in the timestamp's own offset is used.
pub fn parse_calendar_date(raw: &str) -> BillingResult<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.date_naive())
        .map_err(|_| BillingError::validation(format!("Invalid date: {}", raw)))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Advance by whole calendar months. The day of month is kept where possible
/// and clamped to the last day of shorter months (Jan 31 + 1 = Feb 28/29).
pub fn add_months(date: NaiveDate, months: u32) -> BillingResult<NaiveDate> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        BillingError::validation(format!(
            "Date {} plus {} months is out of range",
            format_date(date),
            months
        ))
    })
}

/// First day of the month following `today`. Entries dated before this
/// boundary belong to the current bill, the rest to the next bill.
pub fn next_month_boundary(today: NaiveDate) -> NaiveDate {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}
