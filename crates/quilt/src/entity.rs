use crate::nested::{self, PendingAction};

use quilt_core::{
    schema::{ModelId, Schema},
    stmt::{Record, Value},
    validation::Errors,
    Error, Result,
};

use indexmap::IndexMap;
use tracing::debug;

/// A row of a model, together with its loaded associations and any nested
/// attributes assigned since the last save.
#[derive(Debug, Clone)]
pub struct Entity {
    pub(crate) model: ModelId,

    /// Primary key, once persisted
    pub(crate) key: Option<i64>,

    /// Field values, excluding the primary key
    pub(crate) attributes: Record,

    /// Children keyed by relation name. A has-one relation holds at most one.
    pub(crate) associations: IndexMap<String, Vec<Entity>>,

    /// Errors from the last save attempt
    pub(crate) errors: Errors,

    /// Actions resolved from nested attributes, applied on the next save
    pub(crate) pending: IndexMap<String, Vec<PendingAction>>,

    /// Last payload assigned per relation, as submitted
    payloads: IndexMap<String, Value>,
}

impl Entity {
    pub(crate) fn new(model: ModelId, attributes: Record) -> Entity {
        Entity {
            model,
            key: None,
            attributes,
            associations: IndexMap::new(),
            errors: Errors::new(),
            pending: IndexMap::new(),
            payloads: IndexMap::new(),
        }
    }

    pub(crate) fn persisted(model: ModelId, key: i64, attributes: Record) -> Entity {
        Entity {
            key: Some(key),
            ..Entity::new(model, attributes)
        }
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    /// The primary key, `None` until the entity is first saved.
    pub fn key(&self) -> Option<i64> {
        self.key
    }

    pub fn is_persisted(&self) -> bool {
        self.key.is_some()
    }

    pub fn attributes(&self) -> &Record {
        &self.attributes
    }

    /// The value of field `name`, or `Null` when unset.
    pub fn get(&self, name: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.attributes.get(name).unwrap_or(&NULL)
    }

    /// Casts `attributes` onto the model's fields and merges them over the
    /// current values.
    pub fn assign_attributes(
        &mut self,
        schema: &Schema,
        attributes: impl Into<Value>,
    ) -> Result<()> {
        let attributes = match attributes.into() {
            Value::Record(record) => record,
            Value::Null => return Ok(()),
            other => {
                return Err(Error::invalid_argument(format!(
                    "expected a record of attributes, got a {}",
                    other.kind_name()
                )))
            }
        };

        let model = schema.model(self.model);
        let cast = model.cast(&attributes)?;
        self.attributes.merge(&cast);
        Ok(())
    }

    /// Loaded children of relation `name`.
    pub fn association(&self, name: &str) -> &[Entity] {
        self.associations
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The loaded child of has-one relation `name`, if any.
    pub fn has_one(&self, name: &str) -> Option<&Entity> {
        self.association(name).first()
    }

    /// Errors recorded by the last failed save.
    pub fn errors(&self) -> &Errors {
        &self.errors
    }

    /// Actions that the next save applies for relation `name`.
    pub fn pending_actions(&self, name: &str) -> &[PendingAction] {
        self.pending.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_pending_actions(&self) -> bool {
        self.pending.values().any(|actions| !actions.is_empty())
    }

    /// Assigns a nested attributes payload to relation `name`.
    ///
    /// The payload is sanitized against the relation's cardinality and
    /// resolved against the currently loaded children. Nothing is written
    /// until the entity is saved. On error the entity is left untouched.
    pub fn assign_nested_attributes(
        &mut self,
        schema: &Schema,
        name: &str,
        payload: impl Into<Value>,
    ) -> Result<()> {
        let payload = payload.into();
        let model = schema.model(self.model);
        let relation = model.relation(name)?;

        let Some(config) = relation.nested_attributes() else {
            return Err(Error::invalid_options(format!(
                "nested attributes are not enabled for `{}.{}`",
                model.name, name
            )));
        };

        let mappings = nested::sanitize(relation, config, &payload)?;
        let actions = nested::resolve(schema, relation, config, self.association(name), mappings)?;

        debug!(
            model = %model.name,
            relation = name,
            actions = actions.len(),
            "assigned nested attributes"
        );

        self.pending.insert(name.to_string(), actions);
        self.payloads.insert(name.to_string(), payload);
        Ok(())
    }

    /// The payload last assigned to relation `name`.
    pub fn nested_attributes(&self, name: &str) -> Option<&Value> {
        self.payloads.get(name)
    }
}
