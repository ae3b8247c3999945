// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use std::fmt::Display;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Format the calendar day of `date` in its own timezone, e.g. "October 14".
pub fn calendar_day_label<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: Display,
{
    date.format("%B %-d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_day_label_has_no_padding() {
        let date = Utc.with_ymd_and_hms(2026, 5, 3, 8, 0, 0).unwrap();
        assert_eq!(calendar_day_label(&date), "May 3");
    }

    #[test]
    fn test_format_utc_rfc3339() {
        let date = Utc.with_ymd_and_hms(2026, 10, 14, 9, 30, 5).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-10-14T09:30:05Z");
    }
}
