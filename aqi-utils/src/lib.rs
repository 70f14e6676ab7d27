//! Shared utility functions for AQI crates.

/// Date utility functions
pub mod dates {
    use chrono::{Datelike, NaiveDate};

    /// Date format used for daily record keys and API query parameters: "YYYY-MM-DD"
    pub const DATE_FORMAT: &str = "%Y-%m-%d";

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format(DATE_FORMAT).to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, DATE_FORMAT)?)
    }

    /// The calendar-date portion of a localized ISO timestamp
    /// (e.g. "2024-03-01T13:00" -> "2024-03-01").
    pub fn date_key(timestamp: &str) -> Option<&str> {
        timestamp.get(..10)
    }

    pub fn is_leap_year(year: i32) -> bool {
        NaiveDate::from_ymd_opt(year, 2, 29).is_some()
    }

    /// Number of calendar days in `year` (365 or 366).
    pub fn days_in_year(year: i32) -> usize {
        if is_leap_year(year) {
            366
        } else {
            365
        }
    }

    /// Zero-based day-of-year offset of `date` relative to Jan 1 of `year`.
    ///
    /// Negative or too-large offsets mean the date falls outside the year.
    pub fn day_of_year_offset(year: i32, date: &NaiveDate) -> Option<i64> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
        Some((*date - jan1).num_days())
    }

    /// Calendar month (1-12) of the day at `offset` within `year`.
    pub fn month_for_offset(year: i32, offset: usize) -> Option<u32> {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let date = jan1.checked_add_days(chrono::Days::new(offset as u64))?;
        if date.year() != year {
            return None;
        }
        Some(date.month())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::NaiveDate;

        #[test]
        fn test_days_in_year() {
            assert_eq!(days_in_year(2024), 366);
            assert_eq!(days_in_year(2025), 365);
            assert_eq!(days_in_year(1900), 365);
            assert_eq!(days_in_year(2000), 366);
        }

        #[test]
        fn test_day_of_year_offset() {
            let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
            assert_eq!(day_of_year_offset(2024, &jan1), Some(0));

            let mar1 = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
            assert_eq!(day_of_year_offset(2024, &mar1), Some(60)); // Jan 31 + Feb 29

            let mar1_2025 = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
            assert_eq!(day_of_year_offset(2025, &mar1_2025), Some(59));

            let dec31_prior = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
            assert_eq!(day_of_year_offset(2024, &dec31_prior), Some(-1));
        }

        #[test]
        fn test_month_for_offset() {
            assert_eq!(month_for_offset(2024, 0), Some(1));
            assert_eq!(month_for_offset(2024, 59), Some(2)); // Feb 29
            assert_eq!(month_for_offset(2024, 60), Some(3));
            assert_eq!(month_for_offset(2024, 365), Some(12));
            assert_eq!(month_for_offset(2025, 365), None);
        }

        #[test]
        fn test_date_key() {
            assert_eq!(date_key("2024-03-01T13:00"), Some("2024-03-01"));
            assert_eq!(date_key("2024-03"), None);
        }

        #[test]
        fn test_format_and_parse() {
            let date = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
            let formatted = format_date(&date);
            assert_eq!(formatted, "2023-06-15");
            let parsed = parse_date(&formatted).unwrap();
            assert_eq!(parsed, date);
            assert!(parse_date("2023-13-40").is_err());
        }
    }
}

/// Reporting time zone used for daily buckets and for "today".
pub mod zone {
    use chrono::{FixedOffset, NaiveDate, Offset, Utc};

    /// A reporting zone: the IANA name sent upstream plus its fixed UTC offset.
    ///
    /// Only zones without daylight-saving transitions can be expressed here,
    /// which covers the default `Asia/Bangkok`.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ReportingZone {
        pub name: String,
        pub utc_offset_seconds: i32,
    }

    impl Default for ReportingZone {
        fn default() -> Self {
            ReportingZone {
                name: String::from("Asia/Bangkok"),
                utc_offset_seconds: 7 * 3600,
            }
        }
    }

    impl ReportingZone {
        pub fn offset(&self) -> FixedOffset {
            FixedOffset::east_opt(self.utc_offset_seconds)
                .unwrap_or_else(|| Utc.fix())
        }

        /// Current calendar date in this zone.
        pub fn today(&self) -> NaiveDate {
            Utc::now().with_timezone(&self.offset()).date_naive()
        }
    }

}

/// Numeric helpers
pub mod numbers {
    /// Round to `digits` decimal places, half away from zero.
    ///
    /// Non-finite input yields `None`.
    pub fn round_to(value: f64, digits: i32) -> Option<f64> {
        if !value.is_finite() {
            return None;
        }
        let factor = 10f64.powi(digits);
        Some((value * factor).round() / factor)
    }

}
