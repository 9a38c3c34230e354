//! The calendar month a report is scoped to.

use time::{Date, Month};

/// One calendar month of one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct ReportMonth {
    pub year: i32,
    pub month: Month,
}

impl ReportMonth {
    /// The month `date` falls in.
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Parse a month from the "YYYY-MM" query parameter format.
    ///
    /// Returns `None` for anything that is not a valid year-month pair, so
    /// callers can fall back to the current month.
    pub fn parse(raw: &str) -> Option<Self> {
        let (year, month) = raw.split_once('-')?;

        let year: i32 = year.parse().ok()?;
        let month: u8 = month.parse().ok()?;
        let month = Month::try_from(month).ok()?;

        // Reject years Date cannot represent so first_day cannot panic.
        Date::from_calendar_date(year, month, 1).ok()?;

        Some(Self { year, month })
    }

    /// The first day of the month.
    pub fn first_day(&self) -> Date {
        Date::from_calendar_date(self.year, self.month, 1)
            .expect("year was validated on construction")
    }

    /// The last day of the month.
    pub fn last_day(&self) -> Date {
        let last_day = time::util::days_in_year_month(self.year, self.month);

        Date::from_calendar_date(self.year, self.month, last_day)
            .expect("year was validated on construction")
    }

    /// The month before this one.
    pub fn previous(&self) -> Self {
        match self.month {
            Month::January => Self {
                year: self.year - 1,
                month: Month::December,
            },
            month => Self {
                year: self.year,
                month: month.previous(),
            },
        }
    }

    /// The month after this one.
    pub fn next(&self) -> Self {
        match self.month {
            Month::December => Self {
                year: self.year + 1,
                month: Month::January,
            },
            month => Self {
                year: self.year,
                month: month.next(),
            },
        }
    }

    /// The "YYYY-MM" form used in query parameters.
    pub fn query_value(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month as u8)
    }

    /// The title shown above the report, e.g. "June 2025".
    pub fn title(&self) -> String {
        format!("{} {}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use time::{Month, macros::date};

    use super::ReportMonth;

    #[test]
    fn parses_query_values() {
        let month = ReportMonth::parse("2025-06").unwrap();

        assert_eq!(month.year, 2025);
        assert_eq!(month.month, Month::June);
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["", "2025", "2025-13", "2025-0", "06-2025", "soon"] {
            assert!(ReportMonth::parse(raw).is_none(), "{raw:?} should not parse");
        }
    }

    #[test]
    fn parse_round_trips_through_query_value() {
        let month = ReportMonth::parse("2025-06").unwrap();

        assert_eq!(ReportMonth::parse(&month.query_value()), Some(month));
    }

    #[test]
    fn month_bounds_are_first_and_last_day() {
        let month = ReportMonth::parse("2024-02").unwrap();

        // 2024 is a leap year.
        assert_eq!(month.first_day(), date!(2024 - 02 - 01));
        assert_eq!(month.last_day(), date!(2024 - 02 - 29));
    }

    #[test]
    fn previous_and_next_cross_year_boundaries() {
        let january = ReportMonth::parse("2025-01").unwrap();

        assert_eq!(january.previous(), ReportMonth::parse("2024-12").unwrap());
        assert_eq!(january.next(), ReportMonth::parse("2025-02").unwrap());

        let december = ReportMonth::parse("2024-12").unwrap();
        assert_eq!(december.next(), january);
    }

    #[test]
    fn title_is_month_name_and_year() {
        assert_eq!(ReportMonth::parse("2025-06").unwrap().title(), "June 2025");
    }
}
