use super::Error;

/// Error when a nested attributes payload cannot be interpreted.
///
/// This occurs when:
/// - A list is submitted for a has-one relation, or a single record for a has-many
/// - A collection element is not a record
/// - A record names an attribute the child model does not have
#[derive(Debug)]
pub(super) struct InvalidPayload {
    message: Box<str>,
}

impl std::error::Error for InvalidPayload {}

impl core::fmt::Display for InvalidPayload {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid nested attributes payload: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidPayload(InvalidPayload {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid payload error.
    pub fn is_invalid_payload(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidPayload(_)))
    }
}
