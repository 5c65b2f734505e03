//! Required-field and shape checks for date inputs on forms.
//!
//! These run before [parse_date](crate::parse_date) and never fail hard: a bad field yields a
//! [FieldOutcome] carrying the message to show, and [validate_required_and_format] hands that
//! message to a [NotificationSink].

use crate::date::is_well_shaped;
use tracing::warn;

/// Where user-facing error messages go.
pub trait NotificationSink {
    /// Shows one error message to the user.
    fn display_error(&mut self, message: &str);
}

/// Collects messages in order. Handy for batch validation and tests.
impl NotificationSink for Vec<String> {
    fn display_error(&mut self, message: &str) {
        self.push(message.to_owned());
    }
}

/// Sends messages to the log at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn display_error(&mut self, message: &str) {
        warn!(error = %message, "Form validation failed");
    }
}

/// Result of checking a single date field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The field is filled in and shaped like `DD/MM/YYYY`.
    Valid,
    /// The field was left empty.
    Missing {
        /// `"<label> is required"`
        message: String,
    },
    /// The field is filled in but isn't shaped like `DD/MM/YYYY`.
    Malformed {
        /// `"<label> is invalid"`
        message: String,
    },
}

impl FieldOutcome {
    /// True for [FieldOutcome::Valid].
    pub fn is_valid(&self) -> bool {
        matches!(self, FieldOutcome::Valid)
    }

    /// The message to show the user, if the field failed.
    pub fn message(&self) -> Option<&str> {
        match self {
            FieldOutcome::Valid => None,
            FieldOutcome::Missing { message } | FieldOutcome::Malformed { message } => {
                Some(message.as_str())
            }
        }
    }
}

/// Checks that a date field is filled in and shaped like `DD/MM/YYYY`.
///
/// Only the shape is checked here: `31/02/2024` is valid as far as this function is concerned, and
/// is left for [parse_date](crate::parse_date) to reject. Whitespace-only text counts as filled in
/// and therefore malformed.
///
/// ```
/// use bancoerro::{check_field, FieldOutcome};
///
/// assert_eq!(FieldOutcome::Valid, check_field(Some("1/2/2024"), "Start date"));
/// assert_eq!(Some("Start date is required"), check_field(None, "Start date").message());
/// assert_eq!(Some("Start date is invalid"), check_field(Some("1/2/24"), "Start date").message());
/// ```
pub fn check_field(text: Option<&str>, field_label: &str) -> FieldOutcome {
    match text {
        None | Some("") => FieldOutcome::Missing {
            message: format!("{field_label} is required"),
        },
        Some(text) if !is_well_shaped(text) => FieldOutcome::Malformed {
            message: format!("{field_label} is invalid"),
        },
        Some(_) => FieldOutcome::Valid,
    }
}

/// Runs [check_field], reports any failure to `sink`, and returns whether the field is valid.
pub fn validate_required_and_format(
    text: Option<&str>,
    field_label: &str,
    sink: &mut impl NotificationSink,
) -> bool {
    let outcome = check_field(text, field_label);
    if let Some(message) = outcome.message() {
        sink.display_error(message);
    }
    outcome.is_valid()
}
