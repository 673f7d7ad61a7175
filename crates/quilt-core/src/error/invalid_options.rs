use super::Error;

/// Error when a nested attributes registration is malformed.
///
/// This occurs when:
/// - An option key is not one of `allow_destroy`, `reject_if`, `limit`, `update_only`
/// - `reject_if` is neither a predicate name, a callable, nor absent
/// - `reject_if` names a predicate the parent model does not define
/// - An option does not apply to the relation's cardinality
/// - A relation is registered twice
///
/// These errors are raised while the schema is being built, never while saving.
#[derive(Debug)]
pub(super) struct InvalidOptions {
    message: Box<str>,
}

impl std::error::Error for InvalidOptions {}

impl core::fmt::Display for InvalidOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid nested attributes options: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid options error.
    pub fn invalid_options(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidOptions(InvalidOptions {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid options error.
    pub fn is_invalid_options(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::InvalidOptions(_)))
    }
}
