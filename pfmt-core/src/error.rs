//! Error taxonomy for project CRUD and workbook ingestion.

use thiserror::Error;
use uuid::Uuid;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// A required creation field is missing or blank.
    #[error("Validation: {0}")]
    Validation(String),

    /// The given project id does not resolve to a record.
    #[error("Project not found: {0}")]
    NotFound(Uuid),

    /// The uploaded file is unreadable, not a workbook, or has no sheets.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Record store failure, passed through from the driver.
    #[error("Store error: {0}")]
    Store(#[from] sqlx::Error),

    /// A stored column no longer decodes into its domain type.
    #[error("InvalidData: {0}")]
    InvalidData(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Error::Parse(message.into())
    }

    pub fn invalid_data(message: impl Into<String>) -> Self {
        Error::InvalidData(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::validation("name is required");
        assert_eq!(err.to_string(), "Validation: name is required");

        let id = Uuid::nil();
        let err = Error::NotFound(id);
        assert_eq!(
            err.to_string(),
            "Project not found: 00000000-0000-0000-0000-000000000000"
        );

        let err = Error::parse("No worksheets found");
        assert_eq!(err.to_string(), "Parse error: No worksheets found");
    }
}
