//! Calendar date utilities.

use std::{fmt, str::FromStr};

use derive_more::{Display, Error};
use time::{format_description::BorrowedFormatItem, macros::format_description};

/// Format of dates exchanged with remote services.
const ISO_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Format of dates displayed to a user.
const DISPLAY_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[day]/[month]/[year]");

/// Calendar date without a time zone.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from its calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = time::Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Parses a [`Date`] from its `YYYY-MM-DD` representation.
    ///
    /// Anything following the date part (like a `T00:00:00` time) is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the string doesn't start with a valid date.
    pub fn from_iso(input: &str) -> Result<Self, ParseError> {
        let input = input.trim();
        let date = input.get(..10).ok_or(ParseError::TooShort)?;
        time::Date::parse(date, ISO_FORMAT)
            .map(Self)
            .map_err(ParseError::Parse)
    }

    /// Returns the `YYYY-MM-DD` representation of this [`Date`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso(&self) -> String {
        self.0.format(ISO_FORMAT).unwrap_or_else(|e| {
            panic!("cannot format `Date` as ISO 8601: {e}")
        })
    }

    /// Returns the year of this [`Date`].
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.format(DISPLAY_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl FromStr for Date {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso(s)
    }
}

impl From<time::Date> for Date {
    fn from(date: time::Date) -> Self {
        Self(date)
    }
}

impl From<Date> for time::Date {
    fn from(date: Date) -> Self {
        date.0
    }
}

/// Error of parsing [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Input is too short to contain a `YYYY-MM-DD` date.
    #[display("input is too short to contain a date")]
    TooShort,

    /// Failed to parse the date part.
    Parse(time::error::Parse),
}

#[cfg(test)]
mod spec {
    use super::Date;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(
            Date::from_iso("2024-03-15").unwrap(),
            Date::from_ymd(2024, 3, 15).unwrap(),
        );
        assert_eq!(
            Date::from_iso("2023-12-01T00:00:00").unwrap(),
            Date::from_ymd(2023, 12, 1).unwrap(),
        );

        assert!(Date::from_iso("2024-3-15").is_err());
        assert!(Date::from_iso("2024-02-30").is_err());
        assert!(Date::from_iso("").is_err());
    }

    #[test]
    fn displays_french_dates() {
        let date = Date::from_ymd(2024, 3, 5).unwrap();

        assert_eq!(date.to_string(), "05/03/2024");
        assert_eq!(date.to_iso(), "2024-03-05");
        assert_eq!(date.year(), 2024);
    }

    #[test]
    fn orders_chronologically() {
        let older = Date::from_ymd(2019, 12, 31).unwrap();
        let newer = Date::from_ymd(2020, 1, 1).unwrap();

        assert!(older < newer);
    }
}
