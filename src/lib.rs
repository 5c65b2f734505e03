//! # bancoerro
//!
//! Calendar-date rules for case-management forms, and the error/alert code catalog those forms
//! report through.
//!
//! Dates are entered as text in the fixed `DD/MM/YYYY` format (day and month may have one or two
//! digits, the year has four). Input goes through three steps:
//!
//! 1. [check_field] / [validate_required_and_format] reject empty or misshapen fields with a
//!    user-facing message.
//! 2. [parse_date] turns the text into a [CalendarDate]. Blank text means "no date".
//! 3. [DateRangeValidator] applies business [Rule]s, such as "start before end" or "no more than
//!    two years apart", against the date supplied by a [Clock].
//!
//! ## Examples
//!
//! ```
//! use bancoerro::prelude::*;
//!
//! let mut messages = Vec::new();
//! assert!(validate_required_and_format(Some("10/05/2023"), "Start date", &mut messages));
//! assert!(!validate_required_and_format(Some("2023-05-10"), "End date", &mut messages));
//! assert_eq!(vec!["End date is invalid".to_string()], messages);
//!
//! let today = CalendarDate::new(2024, 1, 15).unwrap();
//! let validator = DateRangeValidator::new(FixedClock(today));
//! let range = DateRange::parse("10/05/2023", "01/12/2023").unwrap();
//!
//! let outcome = validator.validate(
//!     &range,
//!     &[Rule::StartAfterEnd, Rule::EndAfterToday, Rule::StartWithinYearsOfEnd(2)],
//! );
//! assert!(outcome.valid);
//! ```
//!
//! ## Missing dates
//!
//! A [DateRange] bound may be unset. No rule ever substitutes a date for it. Instead each
//! [Rule] reports [Verdict::Indeterminate], and its boolean [check](Rule::check) answers `true`.
//! What `true` means differs per rule, so see each variant's documentation.
//!
//! ## Calendar arithmetic
//!
//! Adding months or years clamps to the end of the target month: January 31st plus one month is
//! February 28th (29th in leap years), and February 29th plus one year is February 28th.
//!
//! ## Prelude
//!
//! Use it with:
//!
//! ```
//! use bancoerro::prelude::*;
//! ```
#![warn(missing_docs)]

mod catalog;
mod clock;
pub mod compare;
mod date;
mod error;
mod form;
mod rules;

pub use crate::catalog::{AlertCatalog, AlertKind, ErrorAlert, InMemoryCatalog};
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::date::{format_date, parse_date, parse_optional_date, CalendarDate, DATE_FORMAT};
pub use crate::error::{CatalogError, DateError};
pub use crate::form::{
    check_field, validate_required_and_format, FieldOutcome, NotificationSink, TracingSink,
};
pub use crate::rules::{
    difference_less_than_years, end_after_today, gap_exceeds_days, minimum_date, start_after_end,
    start_older_than_months, start_within_years_of_end, start_within_years_of_today, DateRange,
    DateRangeValidator, Rule, ValidationOutcome, Verdict, DEFAULT_MAX_SPAN_YEARS,
    DEFAULT_START_AGE_YEARS,
};

/// A convenience module appropriate for glob imports (`use bancoerro::prelude::*;`).
pub mod prelude {
    #[doc(no_inline)]
    pub use crate::AlertCatalog;
    #[doc(no_inline)]
    pub use crate::CalendarDate;
    #[doc(no_inline)]
    pub use crate::Clock;
    #[doc(no_inline)]
    pub use crate::DateError;
    #[doc(no_inline)]
    pub use crate::DateRange;
    #[doc(no_inline)]
    pub use crate::DateRangeValidator;
    #[doc(no_inline)]
    pub use crate::FixedClock;
    #[doc(no_inline)]
    pub use crate::NotificationSink;
    #[doc(no_inline)]
    pub use crate::Rule;
    #[doc(no_inline)]
    pub use crate::SystemClock;
    #[doc(no_inline)]
    pub use crate::Verdict;
    #[doc(no_inline)]
    pub use crate::{check_field, format_date, parse_date, validate_required_and_format};
}
