use chrono::NaiveDate;

/// Reasons a loan form submission is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("All fields are required (missing: {})", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{field} is not a valid date: {value:?} (expected YYYY-MM-DD)")]
    InvalidDate { field: &'static str, value: String },

    #[error("{field} {date} is earlier than today ({today})")]
    DateInPast {
        field: &'static str,
        date: NaiveDate,
        today: NaiveDate,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;
