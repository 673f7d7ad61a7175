mod builder;
mod connect;

pub use builder::Builder;
pub use connect::Connect;

use crate::{nested, Entity, Result};

use quilt_core::{
    driver::{
        operation::{GetByKey, QueryByColumn},
        Capability, Connection, Driver,
    },
    schema::Schema,
    stmt::Value,
    Error,
};

use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// How a save proceeds when the database does not support transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Policy {
    /// Write sequentially without atomicity. A failure part way through
    /// leaves earlier writes in place.
    #[default]
    BestEffort,

    /// Refuse the save with an unsupported feature error.
    FailFast,
}

/// A database handle.
///
/// Clones share the underlying connection; saves are serialized on it so
/// each one owns the connection for its whole duration.
#[derive(Debug, Clone)]
pub struct Db {
    schema: Arc<Schema>,
    driver: Arc<dyn Driver>,
    connection: Arc<Mutex<Box<dyn Connection>>>,
    non_transactional: Policy,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The driver's capability.
    pub fn capability(&self) -> &'static Capability {
        self.driver.capability()
    }

    /// Creates a table for every registered model.
    pub async fn push_schema(&self) -> Result<()> {
        self.connection.lock().await.push_schema(&self.schema).await
    }

    /// Drops every table of the schema.
    pub async fn reset_db(&self) -> Result<()> {
        self.connection.lock().await.reset_db(&self.schema).await
    }

    /// Builds an unsaved entity of `model` from `attributes`.
    pub fn new_entity(&self, model: &str, attributes: impl Into<Value>) -> Result<Entity> {
        let model = self.schema.model_by_name(model)?;
        let mut entity = Entity::new(model.id, Default::default());
        entity.assign_attributes(&self.schema, attributes)?;
        Ok(entity)
    }

    /// Assigns a nested attributes payload to relation `relation` of
    /// `entity`. See [`Entity::assign_nested_attributes`].
    pub fn assign_nested_attributes(
        &self,
        entity: &mut Entity,
        relation: &str,
        payload: impl Into<Value>,
    ) -> Result<()> {
        entity.assign_nested_attributes(&self.schema, relation, payload)
    }

    /// Loads the `model` row with primary key `key`, together with the
    /// children of each of its relations.
    pub async fn find(&self, model: &str, key: i64) -> Result<Entity> {
        let model = self.schema.model_by_name(model)?;
        let mut connection = self.connection.lock().await;

        let mut rows = connection
            .exec(
                &self.schema,
                GetByKey {
                    model: model.id,
                    key,
                }
                .into(),
            )
            .await?
            .rows
            .into_values()?;

        let Some(mut row) = rows.pop() else {
            return Err(Error::record_not_found(format!(
                "{} with key {}",
                model.name, key
            )));
        };
        row.remove(&model.primary_key);

        let mut entity = Entity::persisted(model.id, key, row);

        for relation in &model.relations {
            let target = relation.target(&self.schema);

            let rows = connection
                .exec(
                    &self.schema,
                    QueryByColumn {
                        model: target.id,
                        column: relation.foreign_key.clone(),
                        value: Value::I64(key),
                    }
                    .into(),
                )
                .await?
                .rows
                .into_values()?;

            let mut children = vec![];
            for mut row in rows {
                let Some(child_key) = row.remove(&target.primary_key).and_then(|key| key.as_i64())
                else {
                    return Err(Error::invalid_result(format!(
                        "`{}` row without a primary key",
                        target.table_name
                    )));
                };
                children.push(Entity::persisted(target.id, child_key, row));
            }

            debug!(
                model = %model.name,
                relation = %relation.name,
                children = children.len(),
                "loaded association"
            );

            entity.associations.insert(relation.name.clone(), children);
        }

        Ok(entity)
    }

    /// Saves `entity` and applies its pending nested actions.
    ///
    /// Fails with a save failed error, leaving storage untouched, when the
    /// entity or a staged child is invalid; the entity's errors then hold
    /// every message. Storage failures roll back every write of the save.
    /// In both cases the entity keeps its pre-save state and pending
    /// actions.
    pub async fn save(&self, entity: &mut Entity) -> Result<()> {
        let mut connection = self.connection.lock().await;
        nested::save::save(
            &self.schema,
            &mut **connection,
            self.non_transactional,
            entity,
        )
        .await
    }
}
