use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),
}

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input or statement construction; never a store fault.
    Validation,
    /// The store rejected or failed the operation, including not-found.
    Persistence,
    /// The service-level deadline fired before the store answered.
    DeadlineExceeded,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NotFound(_) | DomainError::Conflict(_) | DomainError::Persistence(_) => {
                ErrorKind::Persistence
            }
            DomainError::ValidationError(_) => ErrorKind::Validation,
            DomainError::DeadlineExceeded(_) => ErrorKind::DeadlineExceeded,
        }
    }
}

// Convert from sqlx errors
impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DomainError::NotFound("Session not found".to_string()),
            sqlx::Error::Database(db_err) => {
                let message = db_err.message();
                if message.contains("UNIQUE") || message.contains("unique") {
                    DomainError::Conflict(format!("Session already exists: {}", message))
                } else {
                    DomainError::Persistence(format!("Database error: {}", message))
                }
            }
            sqlx::Error::ColumnIndexOutOfBounds { index, len } => DomainError::ValidationError(
                format!("Statement column index {} out of bounds ({} columns)", index, len),
            ),
            sqlx::Error::ColumnNotFound(column) => {
                DomainError::ValidationError(format!("Statement is missing column {}", column))
            }
            other => DomainError::Persistence(other.to_string()),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
