use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::services::DATE_FORMAT;

/// Return status of a loan.
///
/// Persisted with the labels used by the original loan sheet so existing
/// `books.json` files stay readable. The English variant names are accepted
/// as aliases when loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoanStatus {
    #[serde(rename = "Đã trả", alias = "Returned")]
    Returned,
    #[default]
    #[serde(rename = "Chưa trả", alias = "NotReturned")]
    NotReturned,
}

impl LoanStatus {
    pub fn toggled(self) -> Self {
        match self {
            LoanStatus::Returned => LoanStatus::NotReturned,
            LoanStatus::NotReturned => LoanStatus::Returned,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LoanStatus::Returned => "Returned",
            LoanStatus::NotReturned => "Not returned",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One book loan: who borrowed which title, and when it is due back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRecord {
    pub id: u32,
    pub title: String,
    pub student: String,
    pub borrow_date: NaiveDate,
    pub return_date: NaiveDate,
    pub status: LoanStatus,
}

/// Status filter applied to the table view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Returned,
    NotReturned,
}

impl StatusFilter {
    pub fn matches(self, record: &LoanRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Returned => record.status == LoanStatus::Returned,
            StatusFilter::NotReturned => record.status == LoanStatus::NotReturned,
        }
    }

    /// Cycles All -> Returned -> NotReturned -> All.
    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Returned,
            StatusFilter::Returned => StatusFilter::NotReturned,
            StatusFilter::NotReturned => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Returned => "Returned",
            StatusFilter::NotReturned => "Not returned",
        }
    }
}

/// Fields of the add/edit form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Student,
    BorrowDate,
    ReturnDate,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Student,
        FormField::BorrowDate,
        FormField::ReturnDate,
    ];

    pub fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Student,
            FormField::Student => FormField::BorrowDate,
            FormField::BorrowDate => FormField::ReturnDate,
            FormField::ReturnDate => FormField::Title,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            FormField::Title => FormField::ReturnDate,
            FormField::Student => FormField::Title,
            FormField::BorrowDate => FormField::Student,
            FormField::ReturnDate => FormField::BorrowDate,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FormField::Title => "Book title",
            FormField::Student => "Borrower",
            FormField::BorrowDate => "Borrow date (YYYY-MM-DD)",
            FormField::ReturnDate => "Return date (YYYY-MM-DD)",
        }
    }
}

/// Raw, unvalidated contents of the add/edit form.
///
/// `editing_id` is `Some` when the form was opened on an existing record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoanDraft {
    pub editing_id: Option<u32>,
    pub title: String,
    pub student: String,
    pub borrow_date: String,
    pub return_date: String,
    pub status: LoanStatus,
}

impl LoanDraft {
    pub fn from_record(record: &LoanRecord) -> Self {
        Self {
            editing_id: Some(record.id),
            title: record.title.clone(),
            student: record.student.clone(),
            borrow_date: record.borrow_date.format(DATE_FORMAT).to_string(),
            return_date: record.return_date.format(DATE_FORMAT).to_string(),
            status: record.status,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn field(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Student => &self.student,
            FormField::BorrowDate => &self.borrow_date,
            FormField::ReturnDate => &self.return_date,
        }
    }

    pub fn field_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Student => &mut self.student,
            FormField::BorrowDate => &mut self.borrow_date,
            FormField::ReturnDate => &mut self.return_date,
        }
    }
}
