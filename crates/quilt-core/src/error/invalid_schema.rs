use super::Error;

/// Error when a schema definition is invalid.
///
/// This occurs when:
/// - Two models, fields or relations share a name
/// - A relation targets a model that was never registered
/// - A relation's foreign key is not a field of the target model
/// - A model has no primary key field
///
/// These errors are caught while the schema is being built.
#[derive(Debug)]
pub(super) struct InvalidSchema {
    message: Box<str>,
}

impl std::error::Error for InvalidSchema {}

impl core::fmt::Display for InvalidSchema {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid schema: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid schema error.
    pub fn invalid_schema(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidSchema(InvalidSchema {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid schema error.
    pub fn is_invalid_schema(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidSchema(_)))
    }
}
