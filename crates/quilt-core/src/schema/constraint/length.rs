use super::Constraint;
use crate::stmt::Value;

#[derive(Debug, Clone)]
pub struct ConstraintLength {
    /// Minimum length (inclusive)
    pub min: Option<usize>,

    /// Maximum length (inclusive)
    pub max: Option<usize>,
}

impl ConstraintLength {
    pub(super) fn check(&self, value: &Value) -> Option<String> {
        let Some(value) = value.as_str() else {
            return None;
        };

        let len = value.chars().count();

        if let Some(min) = self.min {
            if len < min {
                return Some(format!("is too short (minimum is {min} characters)"));
            }
        }

        if let Some(max) = self.max {
            if len > max {
                return Some(format!("is too long (maximum is {max} characters)"));
            }
        }

        None
    }
}

impl From<ConstraintLength> for Constraint {
    fn from(value: ConstraintLength) -> Self {
        Self::Length(value)
    }
}
