//! Calendar date helpers.
//!
//! Dates are canonical `YYYY-MM-DD` strings with no time component. That
//! format is the only one read or written by date-indexed store queries, and
//! its lexicographic order matches chronological order.

use chrono::{Datelike, Days, NaiveDate};

/// Parses a canonical `YYYY-MM-DD` calendar date.
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").ok()
}

/// Formats a date in the canonical `YYYY-MM-DD` form.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the Monday of the week containing `reference`.
#[must_use]
pub fn week_start(reference: NaiveDate) -> NaiveDate {
    reference - Days::new(u64::from(reference.weekday().num_days_from_monday()))
}

/// A reporting period anchored at a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    /// Monday through Sunday of the reference date's week.
    Week { reference: NaiveDate },
    /// The 1st of the reference date's month through the reference date.
    Month { reference: NaiveDate },
}

impl Period {
    /// First day of the period.
    #[must_use]
    pub fn start(self) -> NaiveDate {
        match self {
            Self::Week { reference } => week_start(reference),
            Self::Month { reference } => reference.with_day(1).unwrap_or(reference),
        }
    }

    /// Last day of the period, inclusive.
    #[must_use]
    pub fn end(self) -> NaiveDate {
        match self {
            Self::Week { reference } => week_start(reference) + Days::new(6),
            Self::Month { reference } => reference,
        }
    }

    /// Whether `date` falls inside the period (inclusive on both ends).
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.end()
    }

    /// Every day of the period in order. The sequence is dense: 7 days for a
    /// week, day-of-month days for a month, with no gaps.
    #[must_use]
    pub fn days(self) -> Vec<NaiveDate> {
        let end = self.end();
        self.start()
            .iter_days()
            .take_while(|day| *day <= end)
            .collect()
    }
}
