//! Source of "now" for the domain services.
//!
//! Bill totals depend on the calendar month the computation runs in, so the
//! services never read the wall clock directly. Production wiring uses
//! [`SystemClock`]; tests pin the date with [`FixedClock`].

use chrono::{Local, NaiveDate, NaiveTime, SecondsFormat, Utc};

pub trait Clock: Send + Sync {
    /// Today's calendar date in the server's local time zone
    fn today(&self) -> NaiveDate;

    /// RFC 3339 timestamp used for `createdAt`/`updatedAt`
    fn timestamp(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn timestamp(&self) -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Clock frozen at midnight UTC of a given date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn timestamp(&self) -> String {
        self.today
            .and_time(NaiveTime::MIN)
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
