use super::Error;

/// Error when a nested attributes payload references a child by key that is
/// not currently associated with the parent.
///
/// This is a referential-integrity violation, not a validation failure: it
/// stops a payload from reaching into another parent's children.
#[derive(Debug)]
pub(super) struct StaleReference {
    relation: Box<str>,
    key: Box<str>,
}

impl std::error::Error for StaleReference {}

impl core::fmt::Display for StaleReference {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "stale reference: `{}` has no associated record with key {}",
            self.relation, self.key
        )
    }
}

impl Error {
    /// Creates a stale reference error.
    pub fn stale_reference(relation: impl Into<String>, key: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::StaleReference(StaleReference {
            relation: relation.into().into(),
            key: key.into().into(),
        }))
    }

    /// Returns `true` if this error is a stale reference error.
    pub fn is_stale_reference(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::StaleReference(_)))
    }
}
