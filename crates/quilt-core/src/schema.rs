mod builder;
pub use builder::{Builder, ModelBuilder};

mod constraint;
pub use constraint::{Constraint, ConstraintLength, ConstraintRange};

mod field;
pub use field::Field;

mod model;
pub use model::{Model, ModelId};

mod name;
pub use name::Name;

pub mod nested;
pub use nested::{Guard, NestedAttributes, NestedOptions, Predicate, RejectIf};

mod relation;
pub use relation::{Relation, RelationKind};

use crate::{Error, Result};

#[derive(Debug)]
pub struct Schema {
    pub models: Vec<Model>,
}

impl Schema {
    pub fn builder() -> Builder {
        Builder::default()
    }

    #[track_caller]
    pub fn model(&self, id: impl Into<ModelId>) -> &Model {
        let id = id.into();
        self.models
            .get(id.0)
            .unwrap_or_else(|| panic!("invalid model ID: {id:?}"))
    }

    /// Looks up a model by name.
    pub fn model_by_name(&self, name: &str) -> Result<&Model> {
        self.models
            .iter()
            .find(|model| model.name.as_str() == name)
            .ok_or_else(|| Error::invalid_argument(format!("unknown model `{name}`")))
    }
}
