#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid choice {0:?}. Please enter a valid choice.")]
    InvalidChoice(String),
}

/// A single input or ledger line that could not be turned into a record.
/// Always carries the 1-based line number it came from.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LineError {
    #[error("line {line}: expected {expected} fields, found {found}")]
    FieldCount {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: missing {field}")]
    MissingField { line: u64, field: &'static str },
    #[error("line {line}: invalid {field} {value:?}: {reason}")]
    InvalidAmount {
        line: u64,
        field: &'static str,
        value: String,
        reason: String,
    },
    #[error("line {line}: {reason}")]
    Unreadable { line: u64, reason: String },
}

impl LineError {
    pub fn line(&self) -> u64 {
        match self {
            LineError::FieldCount { line, .. }
            | LineError::MissingField { line, .. }
            | LineError::InvalidAmount { line, .. }
            | LineError::Unreadable { line, .. } => *line,
        }
    }
}
