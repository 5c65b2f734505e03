use crate::date::CalendarDate;

/// The one place "today" comes from.
///
/// Validators read it once per call, so a single validation never sees the date change midway.
/// Tests use [FixedClock] to pin it.
pub trait Clock {
    /// The current calendar date.
    fn today(&self) -> CalendarDate;
}

/// Reads the system clock, in either UTC or the local timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SystemClock {
    /// Today's date in the system's local timezone.
    #[default]
    Local,
    /// Today's date in UTC.
    Utc,
}

impl Clock for SystemClock {
    fn today(&self) -> CalendarDate {
        match self {
            SystemClock::Local => CalendarDate::local_today(),
            SystemClock::Utc => CalendarDate::utc_today(),
        }
    }
}

/// A clock stopped at a given date.
///
/// ```
/// use bancoerro::{CalendarDate, Clock, FixedClock};
///
/// let date = CalendarDate::new(2024, 1, 15).unwrap();
/// assert_eq!(date, FixedClock(date).today());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub CalendarDate);

impl Clock for FixedClock {
    fn today(&self) -> CalendarDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> CalendarDate {
        (**self).today()
    }
}
