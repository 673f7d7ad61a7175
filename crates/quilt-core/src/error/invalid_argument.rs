use super::Error;

/// Error when a caller names something the schema does not define.
///
/// This occurs when:
/// - A relationship lookup names a relation the model does not have
/// - A model lookup names a model that was never registered
/// - An entity is handed to a `Db` whose schema does not own its model
#[derive(Debug)]
pub(super) struct InvalidArgument {
    message: Box<str>,
}

impl std::error::Error for InvalidArgument {}

impl core::fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid argument: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidArgument(InvalidArgument {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid argument error.
    pub fn is_invalid_argument(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidArgument(_)))
    }
}
