use crate::error::DateError;
use chrono::{Datelike, Days, Local, Months, NaiveDate, Utc};
use core::{
    fmt::{self, Display},
    str::FromStr,
};
use tracing::debug;

/// The only text layout dates are read from and written to.
pub const DATE_FORMAT: &str = "DD/MM/YYYY";

const SEPARATOR: u8 = b'/';

/// A day-granularity Gregorian date with no time of day and no zone.
///
/// Ordering is lexicographic over (year, month, day). Values are only created whole: every
/// constructor either yields a real calendar date or fails.
///
/// ```
/// use bancoerro::CalendarDate;
///
/// let date: CalendarDate = "5/3/2024".parse().unwrap();
/// assert_eq!("05/03/2024", date.to_string());
/// assert_eq!(CalendarDate::new(2024, 3, 5).unwrap(), date);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Returns result of a new [CalendarDate] representing the given date, or
    /// [DateError::InvalidDateArguments].
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or(DateError::InvalidDateArguments { year, month, day })
    }

    /// Returns the current date in UTC at the time of this call.
    pub(crate) fn utc_today() -> Self {
        Self(Utc::now().date_naive())
    }

    /// Returns the current date in the system's local timezone at the time of this call.
    pub(crate) fn local_today() -> Self {
        Self(Local::now().date_naive())
    }

    /// Calendar year.
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of the year, `1`–`12`.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of the month, `1`–`31`.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Shifts this date by a whole number of days (negative goes back in time).
    ///
    /// Returns `None` only when the result falls outside the representable range.
    pub fn add_days(&self, days: i64) -> Option<Self> {
        let delta = Days::new(days.unsigned_abs());
        if days >= 0 {
            self.0.checked_add_days(delta)
        } else {
            self.0.checked_sub_days(delta)
        }
        .map(Self)
    }

    /// Shifts this date by a whole number of months (negative goes back in time).
    ///
    /// When the target month is shorter than this date's day, the result is clamped to the last
    /// day of that month, so January 31st plus one month is the end of February.
    pub fn add_months(&self, months: i32) -> Option<Self> {
        let delta = Months::new(months.unsigned_abs());
        if months >= 0 {
            self.0.checked_add_months(delta)
        } else {
            self.0.checked_sub_months(delta)
        }
        .map(Self)
    }

    /// Shifts this date by a whole number of years, clamping February 29th to the 28th in
    /// non-leap target years. Same convention as [Self::add_months].
    pub fn add_years(&self, years: i32) -> Option<Self> {
        self.add_months(years.checked_mul(12)?)
    }
}

impl Display for CalendarDate {
    /// Renders as `DD/MM/YYYY`, zero-padded.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day(), self.month(), self.year())
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    /// Like [parse_date], but blank input is an error since there is no date to return.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_date(s)?.ok_or_else(|| DateError::InvalidFormat {
            text: s.to_owned(),
        })
    }
}

/// Parses a `DD/MM/YYYY` string, where day and month may have one or two digits and the year has
/// exactly four.
///
/// Blank input (empty or whitespace only) is not an error: it means no date was given and yields
/// `Ok(None)`.
///
/// # Errors
///
/// - Returns [DateError::InvalidFormat] if the text is not blank and either doesn't have the
///   expected shape or names a date that doesn't exist (e.g. `31/04/2024`, `29/02/2023`).
///
/// ```
/// use bancoerro::{parse_date, CalendarDate};
///
/// assert_eq!(Ok(None), parse_date("  "));
/// assert_eq!(Ok(Some(CalendarDate::new(2024, 1, 9).unwrap())), parse_date("9/1/2024"));
/// assert!(parse_date("31/02/2024").is_err());
/// ```
pub fn parse_date(text: &str) -> Result<Option<CalendarDate>, DateError> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let date = split_fields(text)
        .and_then(|(day, month, year)| NaiveDate::from_ymd_opt(year, month, day))
        .map(CalendarDate)
        .ok_or_else(|| DateError::InvalidFormat {
            text: text.to_owned(),
        })?;

    debug!(input = %text, %date, "Parsed date");
    Ok(Some(date))
}

/// [parse_date] for input that may be missing altogether. `None` is treated like blank text.
pub fn parse_optional_date(text: Option<&str>) -> Result<Option<CalendarDate>, DateError> {
    text.map_or(Ok(None), parse_date)
}

/// Renders a date as `DD/MM/YYYY`. An absent date renders as the empty string.
///
/// For every date whose year fits in four digits, `parse_date(&format_date(Some(&d)))` gives back
/// `Some(d)`.
pub fn format_date(date: Option<&CalendarDate>) -> String {
    date.map_or_else(String::new, CalendarDate::to_string)
}

/// Returns true if `text` has the `DD/MM/YYYY` shape (one or two digit day and month, four digit
/// year), without checking that it names a real date.
pub(crate) fn is_well_shaped(text: &str) -> bool {
    split_fields(text).is_some()
}

/// Splits `text` into (day, month, year) if it has the expected shape. Nothing may precede or
/// follow the three fields.
fn split_fields(text: &str) -> Option<(u32, u32, i32)> {
    let mut rest = text.as_bytes();
    let day = take_digits(&mut rest, 1, 2)?;
    take_separator(&mut rest)?;
    let month = take_digits(&mut rest, 1, 2)?;
    take_separator(&mut rest)?;
    let year = take_digits(&mut rest, 4, 4)?;
    // four digits always fit in an i32
    rest.is_empty().then_some((day, month, year as i32))
}

fn take_digits(input: &mut &[u8], min_width: usize, max_width: usize) -> Option<u32> {
    let width = input
        .iter()
        .take(max_width)
        .take_while(|byte| byte.is_ascii_digit())
        .count();
    if width < min_width {
        return None;
    }
    let (digits, rest) = input.split_at(width);
    *input = rest;
    Some(
        digits
            .iter()
            .fold(0, |value, digit| value * 10 + u32::from(digit - b'0')),
    )
}

fn take_separator(input: &mut &[u8]) -> Option<()> {
    let (first, rest) = input.split_first()?;
    if *first == SEPARATOR {
        *input = rest;
        Some(())
    } else {
        None
    }
}
