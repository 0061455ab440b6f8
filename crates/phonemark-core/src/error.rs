use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("{0} name is required")]
    EmptyIdentifier(&'static str),
    #[error("invalid {kind} name: {value:?} (letters, digits and underscore only)")]
    InvalidIdentifier { kind: &'static str, value: String },
    #[error("update value is required")]
    EmptyUpdateValue,
    #[error("phone column index {index} is out of range (sheet has {count} columns)")]
    ColumnOutOfRange { index: usize, count: usize },
    #[error("no valid phone numbers found")]
    NoPhoneNumbersFound,
}

/// Coarse classification shared by every crate in the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    NoPhoneNumbersFound,
    Query,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::EmptyIdentifier(_)
            | CoreError::InvalidIdentifier { .. }
            | CoreError::EmptyUpdateValue
            | CoreError::ColumnOutOfRange { .. } => ErrorKind::Config,
            CoreError::NoPhoneNumbersFound => ErrorKind::NoPhoneNumbersFound,
        }
    }
}
