use super::{Field, ModelBuilder, Name, Predicate, Relation};
use crate::{stmt, validation::Errors, Error, Result};

use indexmap::IndexMap;

/// Identifies a model within a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub usize);

pub struct Model {
    /// Uniquely identifies the model within the schema
    pub id: ModelId,

    /// Name of the model
    pub name: Name,

    /// Table the model is stored in
    pub table_name: String,

    /// Name of the auto-assigned integer primary key column
    pub primary_key: String,

    /// Attribute fields, excluding the primary key
    pub fields: Vec<Field>,

    /// Relations in which this model is the parent
    pub relations: Vec<Relation>,

    /// Named predicates `reject_if` guards may refer to
    pub predicates: IndexMap<String, Predicate>,
}

impl Model {
    pub fn builder(name: impl Into<String>) -> ModelBuilder {
        ModelBuilder::new(name)
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Looks up a relation by name.
    pub fn relation(&self, name: &str) -> Result<&Relation> {
        self.relations
            .iter()
            .find(|relation| relation.name == name)
            .ok_or_else(|| {
                Error::invalid_argument(format!(
                    "no relation named `{}` on model `{}`",
                    name, self.name
                ))
            })
    }

    pub fn predicate(&self, name: &str) -> Option<&Predicate> {
        self.predicates.get(name)
    }

    /// Casts `attributes` onto this model's fields.
    ///
    /// Fails with an invalid payload error when an attribute names neither a
    /// field nor the primary key. The primary key is dropped from the
    /// result.
    pub fn cast(&self, attributes: &stmt::Record) -> Result<stmt::Record> {
        let mut ret = stmt::Record::new();

        for (name, value) in attributes.iter() {
            if name == self.primary_key {
                continue;
            }

            let Some(field) = self.field(name) else {
                return Err(Error::invalid_payload(format!(
                    "unknown attribute `{}` for model `{}`",
                    name, self.name
                )));
            };

            ret.insert(name, field.ty.cast(value.clone()));
        }

        Ok(ret)
    }

    /// Evaluates every field's rules against `attributes`.
    pub fn validate(&self, attributes: &stmt::Record) -> Errors {
        let mut errors = Errors::new();

        for field in &self.fields {
            let value = attributes.get(&field.name).unwrap_or(&stmt::Value::Null);
            field.validate(value, &mut errors);
        }

        errors
    }
}

impl std::fmt::Debug for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Model")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("table_name", &self.table_name)
            .field("primary_key", &self.primary_key)
            .field("fields", &self.fields)
            .field("relations", &self.relations)
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl From<&Model> for ModelId {
    fn from(value: &Model) -> Self {
        value.id
    }
}
