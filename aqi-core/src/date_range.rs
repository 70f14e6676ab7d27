use chrono::{Datelike, NaiveDate};

/// A date range iterator that yields each date from the start date
/// through the end date (inclusive).
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    /// The request window for a calendar year: Jan 1 through Dec 31, or
    /// through `today` when `year` is the current year.
    pub fn for_year(year: i32, today: NaiveDate) -> Option<DateRange> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
        let end = if today.year() == year {
            today
        } else {
            NaiveDate::from_ymd_opt(year, 12, 31)?
        };
        Some(DateRange(start, end))
    }

    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }
}

impl Iterator for DateRange {
    type Item = NaiveDate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.0 <= self.1 {
            let current = self.0;
            match current.succ_opt() {
                Some(next) => self.0 = next,
                None => self.1 = current.pred_opt().unwrap_or(current),
            }
            Some(current)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DateRange;
    use chrono::NaiveDate;

    #[test]
    fn test_date_range_iteration() {
        let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 1, 5).unwrap();
        let range = DateRange(start, end);
        let dates: Vec<NaiveDate> = range.collect();
        assert_eq!(dates.len(), 5);
        assert_eq!(dates[0], start);
        assert_eq!(dates[4], end);
    }

    #[test]
    fn test_date_range_empty() {
        let start = NaiveDate::from_ymd_opt(2022, 3, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2022, 3, 14).unwrap();
        assert_eq!(DateRange(start, end).count(), 0);
    }

    #[test]
    fn test_past_year_covers_whole_year() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        let range = DateRange::for_year(2024, today).unwrap();
        assert_eq!(range.start(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(range.end(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
        assert_eq!(range.count(), 366);
    }

    #[test]
    fn test_current_year_stops_today() {
        let today = NaiveDate::from_ymd_opt(2025, 8, 9).unwrap();
        let range = DateRange::for_year(2025, today).unwrap();
        assert_eq!(range.end(), today);
        assert_eq!(range.count(), 221);
    }
}
