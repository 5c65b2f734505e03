/// Errors raised while turning text or numbers into a [`CalendarDate`](crate::CalendarDate).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum DateError {
    /// A non-empty string that is not a `DD/MM/YYYY` rendering of a real calendar date.
    #[error("Date `{text}` is not a valid date in the format {}", crate::DATE_FORMAT)]
    InvalidFormat {
        /// The offending input.
        text: String,
    },

    /// Explicit year, month, and day arguments that don't name a real calendar date.
    #[error(
        "Explicit year ({year}), month ({month}), and day ({day}) arguments cannot be made into a \
         valid date"
    )]
    InvalidDateArguments {
        /// Year argument.
        year: i32,
        /// Month argument.
        month: u32,
        /// Day argument.
        day: u32,
    },
}

/// Errors returned by an [`AlertCatalog`](crate::AlertCatalog).
#[derive(thiserror::Error, Debug, PartialEq, Eq, Clone)]
pub enum CatalogError {
    /// A record with the same system and code is already stored.
    #[error("Error/alert `{code}` already exists for system `{system_code}`")]
    Duplicate {
        /// System the record belongs to.
        system_code: String,
        /// Code of the record.
        code: String,
    },

    /// No record exists with the given system and code.
    #[error("Error/alert `{code}` not found for system `{system_code}`")]
    NotFound {
        /// System the record belongs to.
        system_code: String,
        /// Code of the record.
        code: String,
    },
}
