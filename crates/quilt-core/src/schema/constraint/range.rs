use super::Constraint;
use crate::stmt::Value;

#[derive(Debug, Clone)]
pub struct ConstraintRange {
    /// Minimum value (inclusive)
    pub min: Option<i64>,

    /// Maximum value (inclusive)
    pub max: Option<i64>,
}

impl ConstraintRange {
    pub(super) fn check(&self, value: &Value) -> Option<String> {
        let value = value.as_f64()?;

        if let Some(min) = self.min {
            if value < min as f64 {
                return Some(format!("must be greater than or equal to {min}"));
            }
        }

        if let Some(max) = self.max {
            if value > max as f64 {
                return Some(format!("must be less than or equal to {max}"));
            }
        }

        None
    }
}

impl From<ConstraintRange> for Constraint {
    fn from(value: ConstraintRange) -> Self {
        Self::Range(value)
    }
}
