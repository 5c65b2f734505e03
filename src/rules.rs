use crate::{
    clock::Clock,
    compare::{is_after, is_before},
    date::{format_date, parse_date, CalendarDate},
    error::DateError,
};
use core::fmt::{self, Display};
use tracing::debug;

/// How far back a start date may lie, in years, for
/// [DateRangeValidator::start_within_default_years_of_today].
pub const DEFAULT_START_AGE_YEARS: i32 = 10;

/// How many years a range may span, for [DateRangeValidator::start_within_default_span].
pub const DEFAULT_MAX_SPAN_YEARS: i32 = 2;

/// A pair of optional bounds as entered on a form. Either side may be unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    /// Start of the range, if given.
    pub start: Option<CalendarDate>,
    /// End of the range, if given.
    pub end: Option<CalendarDate>,
}

impl DateRange {
    /// Creates a range from two optional bounds.
    pub fn new(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        Self { start, end }
    }

    /// Parses both bounds with [parse_date]. Blank text leaves the bound unset.
    ///
    /// # Errors
    ///
    /// - Returns [DateError::InvalidFormat] for the first bound that isn't blank and isn't a date.
    pub fn parse(start: &str, end: &str) -> Result<Self, DateError> {
        Ok(Self::new(parse_date(start)?, parse_date(end)?))
    }
}

/// Three-valued result of evaluating a [Rule].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The constraint holds. Also used for vacuous passes (non-positive parameters).
    Satisfied,
    /// The constraint is broken.
    Violated,
    /// A bound the rule needs is unset, so the rule can't be judged.
    Indeterminate,
}

/// A temporal business rule over a [DateRange] and today's date.
///
/// Each rule has a [verdict](Rule::verdict), which is three-valued, and a
/// [check](Rule::check), which is the boolean the case-management forms have always used. The
/// boolean doesn't mean the same thing for every rule, so read each variant's docs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// The start must not be after the end.
    ///
    /// `check` is `true` when a violation is present. A missing bound counts as one.
    StartAfterEnd,

    /// The end must not be after today.
    ///
    /// `check` is `true` when a violation is present. A missing end counts as one.
    EndAfterToday,

    /// The start must not lie further back than this many months (plus one day) before today.
    ///
    /// `check` is `true` when the start is that old. It is also `true` when the start is missing
    /// or the month count isn't positive.
    StartOlderThanMonths(i32),

    /// The end must not lie more than this many days after the start.
    ///
    /// `check` is `true` when the gap is exceeded. It is also `true` when a bound is missing or
    /// the day count isn't positive.
    GapExceedsDays(i32),

    /// The end must not lie more than this many years after the start.
    ///
    /// `check` is `true` when the range fits, i.e. it passes. It is also `true` when a bound is
    /// missing or the year count isn't positive.
    StartWithinYearsOfEnd(i32),

    /// The start must not lie more than this many years before today.
    ///
    /// `check` is `true` when the start is recent enough. It is also `true` when the start is
    /// missing or the year count isn't positive.
    StartWithinYearsOfToday(i32),
}

impl Rule {
    /// Stable key naming this rule, for looking up a user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            Rule::StartAfterEnd => "date.start_after_end",
            Rule::EndAfterToday => "date.end_after_today",
            Rule::StartOlderThanMonths(_) => "date.start_older_than_months",
            Rule::GapExceedsDays(_) => "date.gap_exceeds_days",
            Rule::StartWithinYearsOfEnd(_) => "date.span_exceeds_years",
            Rule::StartWithinYearsOfToday(_) => "date.start_older_than_years",
        }
    }

    /// Whether an [Indeterminate](Verdict::Indeterminate) verdict should fail validation.
    ///
    /// The ordering and not-in-the-future rules have always rejected incomplete input. The rest
    /// let it through.
    pub fn rejects_missing(&self) -> bool {
        matches!(self, Rule::StartAfterEnd | Rule::EndAfterToday)
    }

    /// Evaluates this rule to a three-valued [Verdict].
    pub fn verdict(&self, range: &DateRange, today: CalendarDate) -> Verdict {
        let (start, end) = (range.start.as_ref(), range.end.as_ref());

        let broken = match *self {
            Rule::StartAfterEnd => match (start, end) {
                (Some(_), Some(_)) => is_after(start, end),
                _ => return Verdict::Indeterminate,
            },
            Rule::EndAfterToday => match end {
                Some(_) => is_after(end, Some(&today)),
                None => return Verdict::Indeterminate,
            },
            Rule::StartOlderThanMonths(months) => {
                if months <= 0 {
                    return Verdict::Satisfied;
                }
                match start {
                    Some(start) => older_than_months(start, months, &today),
                    None => return Verdict::Indeterminate,
                }
            }
            Rule::GapExceedsDays(days) => {
                if days <= 0 {
                    return Verdict::Satisfied;
                }
                match (start, end) {
                    (Some(start), Some(end)) => gap_exceeds(start, end, days),
                    _ => return Verdict::Indeterminate,
                }
            }
            Rule::StartWithinYearsOfEnd(years) => {
                if years <= 0 {
                    return Verdict::Satisfied;
                }
                match (start, end) {
                    (Some(start), Some(end)) => span_exceeds(start, end, years),
                    _ => return Verdict::Indeterminate,
                }
            }
            Rule::StartWithinYearsOfToday(years) => {
                if years <= 0 {
                    return Verdict::Satisfied;
                }
                match start {
                    Some(start) => !difference_less_than_years(start, &today, years),
                    None => return Verdict::Indeterminate,
                }
            }
        };

        if broken {
            Verdict::Violated
        } else {
            Verdict::Satisfied
        }
    }

    /// Evaluates this rule to its historical boolean. See each variant for what `true` means.
    pub fn check(&self, range: &DateRange, today: CalendarDate) -> bool {
        let (start, end) = (range.start.as_ref(), range.end.as_ref());
        match *self {
            Rule::StartAfterEnd => start_after_end(start, end),
            Rule::EndAfterToday => end_after_today(end, &today),
            Rule::StartOlderThanMonths(months) => start_older_than_months(start, months, &today),
            Rule::GapExceedsDays(days) => gap_exceeds_days(start, end, days),
            Rule::StartWithinYearsOfEnd(years) => start_within_years_of_end(start, end, years),
            Rule::StartWithinYearsOfToday(years) => {
                start_within_years_of_today(start, years, &today)
            }
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::StartAfterEnd => f.write_str("start not after end"),
            Rule::EndAfterToday => f.write_str("end not after today"),
            Rule::StartOlderThanMonths(n) => write!(f, "start at most {n} month(s) ago"),
            Rule::GapExceedsDays(n) => write!(f, "at most {n} day(s) between start and end"),
            Rule::StartWithinYearsOfEnd(n) => {
                write!(f, "at most {n} year(s) between start and end")
            }
            Rule::StartWithinYearsOfToday(n) => write!(f, "start at most {n} year(s) ago"),
        }
    }
}

/// Result of validating a range against a list of rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    /// Whether every rule passed.
    pub valid: bool,
    /// [Rule::message_key] of the first rule that failed, if any.
    pub message_key: Option<&'static str>,
}

impl ValidationOutcome {
    /// An outcome where every rule passed.
    pub fn passed() -> Self {
        Self {
            valid: true,
            message_key: None,
        }
    }

    /// An outcome where `rule` failed.
    pub fn failed(rule: &Rule) -> Self {
        Self {
            valid: false,
            message_key: Some(rule.message_key()),
        }
    }
}

/// Applies [Rule]s against the date supplied by a [Clock].
///
/// Today's date is read once per call, so rules evaluated together always agree on it.
///
/// ```
/// use bancoerro::{CalendarDate, DateRange, DateRangeValidator, FixedClock, Rule};
///
/// let today = CalendarDate::new(2024, 1, 15).unwrap();
/// let validator = DateRangeValidator::new(FixedClock(today));
///
/// let range = DateRange::parse("10/05/2023", "01/05/2023").unwrap();
/// let outcome = validator.validate(&range, &[Rule::EndAfterToday, Rule::StartAfterEnd]);
/// assert!(!outcome.valid);
/// assert_eq!(Some("date.start_after_end"), outcome.message_key);
///
/// assert_eq!("15/07/2023", validator.minimum_date(6));
/// ```
#[derive(Debug, Clone)]
pub struct DateRangeValidator<C: Clock> {
    clock: C,
}

impl<C: Clock> DateRangeValidator<C> {
    /// Creates a validator that takes "today" from `clock`.
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    /// Runs `rules` in order and reports the first failure.
    ///
    /// A rule fails on a [Verdict::Violated], or on a [Verdict::Indeterminate] when
    /// [Rule::rejects_missing] says so.
    pub fn validate(&self, range: &DateRange, rules: &[Rule]) -> ValidationOutcome {
        let today = self.clock.today();
        for rule in rules {
            let verdict = rule.verdict(range, today);
            debug!(%rule, ?verdict, ?range, %today, "Evaluated date rule");
            let failed = match verdict {
                Verdict::Satisfied => false,
                Verdict::Violated => true,
                Verdict::Indeterminate => rule.rejects_missing(),
            };
            if failed {
                return ValidationOutcome::failed(rule);
            }
        }
        ValidationOutcome::passed()
    }

    /// The [Verdict] of each rule, in order, all against the same reading of the clock.
    pub fn verdicts(&self, range: &DateRange, rules: &[Rule]) -> Vec<(Rule, Verdict)> {
        let today = self.clock.today();
        rules
            .iter()
            .map(|rule| (*rule, rule.verdict(range, today)))
            .collect()
    }

    /// See [start_after_end].
    pub fn start_after_end(
        &self,
        start: Option<&CalendarDate>,
        end: Option<&CalendarDate>,
    ) -> bool {
        start_after_end(start, end)
    }

    /// See [end_after_today].
    pub fn end_after_today(&self, end: Option<&CalendarDate>) -> bool {
        end_after_today(end, &self.clock.today())
    }

    /// See [start_older_than_months].
    pub fn start_older_than_months(&self, start: Option<&CalendarDate>, months: i32) -> bool {
        start_older_than_months(start, months, &self.clock.today())
    }

    /// See [gap_exceeds_days].
    pub fn gap_exceeds_days(
        &self,
        start: Option<&CalendarDate>,
        end: Option<&CalendarDate>,
        days: i32,
    ) -> bool {
        gap_exceeds_days(start, end, days)
    }

    /// See [start_within_years_of_end].
    pub fn start_within_years_of_end(
        &self,
        start: Option<&CalendarDate>,
        end: Option<&CalendarDate>,
        years: i32,
    ) -> bool {
        start_within_years_of_end(start, end, years)
    }

    /// See [start_within_years_of_today].
    pub fn start_within_years_of_today(&self, start: Option<&CalendarDate>, years: i32) -> bool {
        start_within_years_of_today(start, years, &self.clock.today())
    }

    /// See [minimum_date].
    pub fn minimum_date(&self, months: i32) -> String {
        minimum_date(months, &self.clock.today())
    }

    /// Parses `start` and checks it lies within [DEFAULT_START_AGE_YEARS] of today.
    ///
    /// # Errors
    ///
    /// - Returns [DateError::InvalidFormat] if `start` isn't blank and isn't a date.
    pub fn start_within_default_years_of_today(&self, start: &str) -> Result<bool, DateError> {
        let start = parse_date(start)?;
        Ok(self.start_within_years_of_today(start.as_ref(), DEFAULT_START_AGE_YEARS))
    }

    /// Parses both bounds and checks the end lies within [DEFAULT_MAX_SPAN_YEARS] of the start.
    ///
    /// # Errors
    ///
    /// - Returns [DateError::InvalidFormat] for the first bound that isn't blank and isn't a date.
    pub fn start_within_default_span(&self, start: &str, end: &str) -> Result<bool, DateError> {
        let range = DateRange::parse(start, end)?;
        Ok(self.start_within_years_of_end(
            range.start.as_ref(),
            range.end.as_ref(),
            DEFAULT_MAX_SPAN_YEARS,
        ))
    }
}

fn older_than_months(start: &CalendarDate, months: i32, today: &CalendarDate) -> bool {
    start
        .add_months(months)
        .and_then(|limit| limit.add_days(1))
        .is_some_and(|limit| limit < *today)
}

fn gap_exceeds(start: &CalendarDate, end: &CalendarDate, days: i32) -> bool {
    start
        .add_days(i64::from(days))
        .is_some_and(|limit| limit < *end)
}

fn span_exceeds(start: &CalendarDate, end: &CalendarDate, years: i32) -> bool {
    start.add_years(years).is_some_and(|limit| limit < *end)
}

/// Returns `true` when a violation is present: `start` is strictly after `end`, or either one is
/// missing.
pub fn start_after_end(start: Option<&CalendarDate>, end: Option<&CalendarDate>) -> bool {
    start.is_none() || end.is_none() || is_after(start, end)
}

/// Returns `true` when a violation is present: `end` is strictly after `today`, or it is missing.
pub fn end_after_today(end: Option<&CalendarDate>, today: &CalendarDate) -> bool {
    end.is_none() || is_after(end, Some(today))
}

/// Returns `true` when `start` plus `months` months plus one day is still before `today`, i.e.
/// the start lies further back than the allowed window.
///
/// Also `true` when `months` isn't positive or `start` is missing.
pub fn start_older_than_months(
    start: Option<&CalendarDate>,
    months: i32,
    today: &CalendarDate,
) -> bool {
    if months <= 0 {
        return true;
    }
    start.map_or(true, |start| older_than_months(start, months, today))
}

/// Returns `true` when `start` plus `days` days is still before `end`, i.e. the gap is larger
/// than allowed.
///
/// Also `true` when `days` isn't positive or a bound is missing.
pub fn gap_exceeds_days(
    start: Option<&CalendarDate>,
    end: Option<&CalendarDate>,
    days: i32,
) -> bool {
    if days <= 0 {
        return true;
    }
    match (start, end) {
        (Some(start), Some(end)) => gap_exceeds(start, end, days),
        _ => true,
    }
}

/// Returns `false` when `start` plus `years` years is still before `end` (the range is too long),
/// `true` otherwise.
///
/// Also `true` when `years` isn't positive or a bound is missing.
pub fn start_within_years_of_end(
    start: Option<&CalendarDate>,
    end: Option<&CalendarDate>,
    years: i32,
) -> bool {
    if years <= 0 {
        return true;
    }
    match (start, end) {
        (Some(start), Some(end)) => !span_exceeds(start, end, years),
        _ => true,
    }
}

/// Returns `false` when `start` is before `today` minus `years` years, `true` otherwise.
///
/// Also `true` when `years` isn't positive or `start` is missing.
///
/// ```
/// use bancoerro::{start_within_years_of_today, CalendarDate};
///
/// let today = CalendarDate::new(2024, 1, 15).unwrap();
/// let recent = CalendarDate::new(2014, 1, 16).unwrap();
/// let old = CalendarDate::new(2014, 1, 14).unwrap();
/// assert!(start_within_years_of_today(Some(&recent), 10, &today));
/// assert!(!start_within_years_of_today(Some(&old), 10, &today));
/// ```
pub fn start_within_years_of_today(
    start: Option<&CalendarDate>,
    years: i32,
    today: &CalendarDate,
) -> bool {
    if years <= 0 {
        return true;
    }
    start.map_or(true, |start| difference_less_than_years(start, today, years))
}

/// Returns `false` when `start` is before `end` minus `years` years, `true` otherwise.
///
/// A limit too far back to represent counts as `true`.
pub fn difference_less_than_years(start: &CalendarDate, end: &CalendarDate, years: i32) -> bool {
    let limit = years.checked_neg().and_then(|back| end.add_years(back));
    !is_before(Some(start), limit.as_ref())
}

/// The earliest date a calendar picker should offer: `today` minus `months` months, formatted as
/// `DD/MM/YYYY`. Empty when `months` isn't positive.
pub fn minimum_date(months: i32, today: &CalendarDate) -> String {
    if months <= 0 {
        return String::new();
    }
    let limit = months.checked_neg().and_then(|back| today.add_months(back));
    format_date(limit.as_ref())
}
