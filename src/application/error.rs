use thiserror::Error;

use crate::domain::OverpaymentError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Student already exists or name is blank: '{0}'")]
    DuplicateStudent(String),

    #[error("Student not found: {0}")]
    UnknownStudent(String),

    #[error("Invalid duration: {0} (must be positive)")]
    InvalidDuration(String),

    #[error("Invalid hours: {0} (must be positive)")]
    InvalidHours(String),

    #[error("Payment rejected for {student}: {source}")]
    Overpayment {
        student: String,
        source: OverpaymentError,
    },

    #[error("Index {index} out of range (student has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Not a permutation of the current student list: {0}")]
    InvalidPermutation(String),

    #[error("Persistence error: {0}")]
    Persistence(#[source] anyhow::Error),

    #[error("Export error: {0}")]
    Export(#[source] anyhow::Error),
}

impl AppError {
    pub(crate) fn overpayment(student: &str, source: OverpaymentError) -> Self {
        AppError::Overpayment {
            student: student.to_string(),
            source,
        }
    }
}
