use super::Error;

/// Error when the storage layer itself fails.
///
/// This wraps errors from driver libraries:
/// - Connection errors and timeouts
/// - Constraint violations (unique, not null, foreign key)
/// - Transaction lifecycle errors (BEGIN, COMMIT, ROLLBACK)
///
/// This is never a validation failure and is never retried.
#[derive(Debug)]
pub(super) struct PersistenceFailed {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for PersistenceFailed {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl core::fmt::Display for PersistenceFailed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str("persistence failed: ")?;
        core::fmt::Display::fmt(&self.inner, f)?;
        let mut source = self.inner.source();
        while let Some(err) = source {
            write!(f, ": {}", err)?;
            source = err.source();
        }
        Ok(())
    }
}

impl Error {
    /// Creates an error from a storage failure.
    ///
    /// This is the preferred way for drivers to convert library errors
    /// (rusqlite, I/O, ...) into quilt errors.
    pub fn persistence_failed(err: impl std::error::Error + Send + Sync + 'static) -> Error {
        Error::from(super::ErrorKind::PersistenceFailed(PersistenceFailed {
            inner: Box::new(err),
        }))
    }

    /// Creates a storage failure from a message, for drivers that detect the
    /// failure themselves.
    pub fn persistence_failed_msg(message: impl Into<String>) -> Error {
        let message: String = message.into();
        Error::from(super::ErrorKind::PersistenceFailed(PersistenceFailed {
            inner: message.into(),
        }))
    }

    /// Returns `true` if this error is a storage failure.
    pub fn is_persistence_failed(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::PersistenceFailed(_)))
    }
}
