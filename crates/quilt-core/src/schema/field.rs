use super::Constraint;
use crate::{stmt, validation::Errors};

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name, also used as the column name
    pub name: String,

    /// Storage type
    pub ty: stmt::Type,

    /// True if the column accepts null
    pub nullable: bool,

    /// True if the column carries a unique index
    pub unique: bool,

    /// Validation rules, evaluated in order
    pub constraints: Vec<Constraint>,
}

impl Field {
    pub fn new(name: impl Into<String>, ty: stmt::Type) -> Field {
        Field {
            name: name.into(),
            ty,
            nullable: true,
            unique: false,
            constraints: vec![],
        }
    }

    pub fn nullable(mut self, nullable: bool) -> Field {
        self.nullable = nullable;
        self
    }

    pub fn unique(mut self) -> Field {
        self.unique = true;
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Field {
        self.constraints.push(constraint);
        self
    }

    /// Records every rule `value` violates under this field's name.
    pub(crate) fn validate(&self, value: &stmt::Value, errors: &mut Errors) {
        if !value.is_null() && !self.ty.accepts(value) {
            errors.add(&self.name, "is invalid");
            return;
        }

        for constraint in &self.constraints {
            if let Some(message) = constraint.check(value) {
                errors.add(&self.name, message);
            }
        }
    }
}
