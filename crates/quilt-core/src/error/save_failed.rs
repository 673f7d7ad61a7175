use super::Error;
use crate::validation::{ChildErrors, Errors};

/// Error when a save is refused because the parent or one of its nested
/// children failed validation.
///
/// Carries the parent's error collection, which already holds the child
/// errors under association-scoped keys, and the per-child errors they were
/// lifted from.
#[derive(Debug)]
pub struct SaveFailed {
    parent_errors: Errors,
    child_errors: Vec<ChildErrors>,
}

impl SaveFailed {
    /// The parent's errors, including aggregated child errors.
    pub fn parent_errors(&self) -> &Errors {
        &self.parent_errors
    }

    /// Errors of each failing child, in submission order.
    pub fn child_errors(&self) -> &[ChildErrors] {
        &self.child_errors
    }
}

impl std::error::Error for SaveFailed {}

impl core::fmt::Display for SaveFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("validation failed")?;

        let mut sep = ": ";
        for message in self.parent_errors.full_messages() {
            write!(f, "{sep}{message}")?;
            sep = ", ";
        }
        Ok(())
    }
}

impl Error {
    /// Creates a save failed error.
    pub fn save_failed(parent_errors: Errors, child_errors: Vec<ChildErrors>) -> Error {
        Error::from(super::ErrorKind::SaveFailed(SaveFailed {
            parent_errors,
            child_errors,
        }))
    }

    /// Returns `true` if this error is a save failed error.
    pub fn is_save_failed(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::SaveFailed(_)))
    }

    /// Returns the validation details when this error is a save failed error.
    pub fn as_save_failed(&self) -> Option<&SaveFailed> {
        self.find(|kind| match kind {
            super::ErrorKind::SaveFailed(err) => Some(err),
            _ => None,
        })
    }
}
