//! Validation rules applied to the loan form before anything reaches the store.
//!
//! A submission is checked in three passes: every field must be filled in,
//! both dates must parse as ISO calendar dates, and neither date may fall
//! before the day of submission.

use super::errors::{ValidationError, ValidationResult};
use super::models::{FormField, LoanDraft, LoanRecord};
use chrono::NaiveDate;

/// Date format accepted by the form and written to storage.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Turns a [`LoanDraft`] into a [`LoanRecord`] or explains why it cannot.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use loanbook::domain::{LoanDraft, LoanValidator};
///
/// let today = NaiveDate::from_ymd_opt(2030, 5, 1).unwrap();
/// let draft = LoanDraft {
///     title: "Tắt đèn".to_string(),
///     student: "Minh".to_string(),
///     borrow_date: "2030-05-01".to_string(),
///     return_date: "2030-05-15".to_string(),
///     ..LoanDraft::default()
/// };
///
/// let record = LoanValidator::validate(&draft, 7, today).unwrap();
/// assert_eq!(record.id, 7);
/// assert_eq!(record.title, "Tắt đèn");
/// ```
pub struct LoanValidator;

impl LoanValidator {
    /// Validates `draft` against `today` and builds the record with `id`.
    ///
    /// Title and borrower are stored trimmed. The status of the draft is
    /// carried over unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: [`ValidationError::MissingFields`]
    /// listing every empty field, then [`ValidationError::InvalidDate`], then
    /// [`ValidationError::DateInPast`].
    pub fn validate(draft: &LoanDraft, id: u32, today: NaiveDate) -> ValidationResult<LoanRecord> {
        let missing: Vec<&'static str> = FormField::ALL
            .iter()
            .filter(|field| draft.field(**field).trim().is_empty())
            .map(|field| Self::field_name(*field))
            .collect();
        if !missing.is_empty() {
            return Err(ValidationError::MissingFields(missing));
        }

        let borrow_date = Self::parse_date(FormField::BorrowDate, &draft.borrow_date)?;
        let return_date = Self::parse_date(FormField::ReturnDate, &draft.return_date)?;

        for (field, date) in [(FormField::BorrowDate, borrow_date), (FormField::ReturnDate, return_date)] {
            if date < today {
                return Err(ValidationError::DateInPast {
                    field: Self::field_name(field),
                    date,
                    today,
                });
            }
        }

        Ok(LoanRecord {
            id,
            title: draft.title.trim().to_string(),
            student: draft.student.trim().to_string(),
            borrow_date,
            return_date,
            status: draft.status,
        })
    }

    fn parse_date(field: FormField, value: &str) -> ValidationResult<NaiveDate> {
        let value = value.trim();
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
            field: Self::field_name(field),
            value: value.to_string(),
        })
    }

    fn field_name(field: FormField) -> &'static str {
        match field {
            FormField::Title => "title",
            FormField::Student => "borrower",
            FormField::BorrowDate => "borrow date",
            FormField::ReturnDate => "return date",
        }
    }
}
