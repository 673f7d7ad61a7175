mod length;
pub use length::ConstraintLength;

mod range;
pub use range::ConstraintRange;

use crate::stmt::Value;

/// A validation rule attached to a field.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// The value must not be blank
    Presence,

    /// String length bounds, in characters
    Length(ConstraintLength),

    /// Numeric bounds
    Range(ConstraintRange),
}

impl Constraint {
    pub fn presence() -> Self {
        Constraint::Presence
    }

    pub fn length(min: Option<usize>, max: Option<usize>) -> Self {
        ConstraintLength { min, max }.into()
    }

    pub fn length_less_than(max: usize) -> Self {
        Self::length(None, Some(max))
    }

    pub fn range(min: Option<i64>, max: Option<i64>) -> Self {
        ConstraintRange { min, max }.into()
    }

    /// Checks `value`, returning the validation message on failure.
    ///
    /// Only `Presence` rejects blank values; the other rules ignore null.
    pub fn check(&self, value: &Value) -> Option<String> {
        match self {
            Constraint::Presence => value.is_blank().then(|| "can't be blank".to_string()),
            Constraint::Length(length) => length.check(value),
            Constraint::Range(range) => range.check(value),
        }
    }
}
