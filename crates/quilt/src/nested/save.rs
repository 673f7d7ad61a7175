//! Saving a parent together with its pending nested actions.

use super::{aggregate, ActionKind};
use crate::{db::Policy, Entity};

use quilt_core::{
    driver::{
        operation::{DeleteByKey, Insert, Transaction, UpdateByKey},
        Connection, Operation, Response,
    },
    schema::{Model, Schema},
    stmt::{Record, Value},
    validation::Errors,
    Error, Result,
};

use std::sync::Arc;
use tracing::{debug, info, warn};

/// State the parent takes once the save commits.
struct Committed {
    key: i64,
    associations: Vec<(String, Vec<Entity>)>,
}

/// Validates `entity` and its staged children, then writes the parent and
/// applies every pending action in order.
///
/// Nothing is written when validation fails. When the connection supports
/// transactions all writes share one transaction and are rolled back on the
/// first failure; otherwise `policy` decides between refusing the save and
/// writing without atomicity. The in-memory graph changes only after every
/// write succeeded.
pub(crate) async fn save(
    schema: &Arc<Schema>,
    connection: &mut dyn Connection,
    policy: Policy,
    entity: &mut Entity,
) -> Result<()> {
    let model = schema.model(entity.model);

    validate(schema, model, entity)?;

    let transactional = connection.capability().transactions;

    if !transactional {
        match policy {
            Policy::FailFast => {
                return Err(Error::unsupported_feature(format!(
                    "cannot save `{}` atomically: the database does not support transactions",
                    model.name
                )))
            }
            Policy::BestEffort => warn!(
                model = %model.name,
                "database does not support transactions; saving without atomicity"
            ),
        }
    }

    let mut cx = Cx { schema, connection };

    if transactional {
        cx.exec(Transaction::Start).await?;
    }

    let committed = match cx.apply(model, entity).await {
        Ok(committed) => committed,
        Err(err) => {
            if transactional {
                warn!(model = %model.name, error = %err, "save failed; rolling back");
                if let Err(rollback) = cx.exec(Transaction::Rollback).await {
                    warn!(error = %rollback, "rollback failed");
                }
            } else {
                warn!(
                    model = %model.name,
                    error = %err,
                    "save failed; writes made before the failure were not rolled back"
                );
            }
            return Err(err);
        }
    };

    if transactional {
        if let Err(err) = cx.exec(Transaction::Commit).await {
            if let Err(rollback) = cx.exec(Transaction::Rollback).await {
                warn!(error = %rollback, "rollback after failed commit failed");
            }
            return Err(err);
        }
    }

    let created = entity.key.is_none();
    entity.key = Some(committed.key);
    for (name, children) in committed.associations {
        entity.associations.insert(name, children);
    }
    entity.pending.clear();

    info!(
        model = %model.name,
        key = committed.key,
        created,
        "saved"
    );

    Ok(())
}

/// Runs the validation rules of the parent and every staged create or
/// update, lifting child errors into the parent.
fn validate(schema: &Schema, model: &Model, entity: &mut Entity) -> Result<()> {
    let mut errors: Errors = model.validate(&entity.attributes);
    let mut child_errors = vec![];

    for (name, actions) in entity.pending.iter_mut() {
        let relation = model.relation(name)?;
        let target = schema.model(relation.target);

        for action in actions.iter_mut() {
            let Some(child) = action.child.as_mut() else {
                continue;
            };

            child.errors = target.validate(&child.attributes);

            // Assigned from the parent's key at save time
            child.errors.remove(&relation.foreign_key);
        }

        child_errors.extend(aggregate(relation, actions, &mut errors));
    }

    entity.errors = errors.clone();

    if errors.is_empty() {
        return Ok(());
    }

    debug!(
        model = %model.name,
        errors = errors.len(),
        children = child_errors.len(),
        "validation failed"
    );

    Err(Error::save_failed(errors, child_errors))
}

struct Cx<'a> {
    schema: &'a Arc<Schema>,
    connection: &'a mut dyn Connection,
}

impl Cx<'_> {
    async fn exec(&mut self, op: impl Into<Operation>) -> Result<Response> {
        let op = op.into();
        debug!(?op, "exec");
        self.connection.exec(self.schema, op).await
    }

    async fn insert(&mut self, model: &Model, values: Record) -> Result<i64> {
        let rows = self
            .exec(Insert {
                model: model.id,
                values,
            })
            .await?
            .rows
            .into_values()?;

        rows.first()
            .and_then(|row| row.get(&model.primary_key))
            .and_then(Value::as_i64)
            .ok_or_else(|| {
                Error::invalid_result(format!(
                    "insert into `{}` did not return a key",
                    model.table_name
                ))
            })
    }

    async fn update(&mut self, model: &Model, key: i64, assignments: Record) -> Result<()> {
        let count = self
            .exec(UpdateByKey {
                model: model.id,
                key,
                assignments,
            })
            .await?
            .rows
            .into_count()?;

        if count == 0 {
            return Err(Error::persistence_failed_msg(format!(
                "{} with key {} no longer exists",
                model.name, key
            )));
        }

        Ok(())
    }

    async fn delete(&mut self, model: &Model, keys: Vec<i64>) -> Result<()> {
        self.exec(DeleteByKey {
            model: model.id,
            keys,
        })
        .await?;
        Ok(())
    }

    /// Writes the parent and applies the pending actions, returning the
    /// state to adopt on commit.
    async fn apply(&mut self, model: &Model, entity: &Entity) -> Result<Committed> {
        let key = match entity.key {
            Some(key) => {
                self.update(model, key, entity.attributes.clone()).await?;
                key
            }
            None => self.insert(model, entity.attributes.clone()).await?,
        };

        let mut associations = vec![];

        for (name, actions) in &entity.pending {
            let relation = model.relation(name)?;
            let target = self.schema.model(relation.target);
            let mut children = entity.association(name).to_vec();

            for action in actions {
                match (action.kind(), &action.child) {
                    (ActionKind::Create, Some(child)) => {
                        if relation.is_has_one() {
                            // A has-one holds a single child; the new one
                            // replaces whatever is there.
                            let replaced: Vec<i64> =
                                children.drain(..).filter_map(|child| child.key).collect();
                            if !replaced.is_empty() {
                                self.delete(target, replaced).await?;
                            }
                        }

                        let mut child = child.clone();
                        child.attributes.insert(&relation.foreign_key, key);
                        child.key = Some(self.insert(target, child.attributes.clone()).await?);
                        children.push(child);
                    }
                    (ActionKind::Update, Some(child)) => {
                        let Some(child_key) = action.target() else {
                            continue;
                        };

                        self.update(target, child_key, child.attributes.clone())
                            .await?;

                        if let Some(slot) = children.iter_mut().find(|c| c.key == Some(child_key)) {
                            *slot = child.clone();
                        }
                    }
                    (ActionKind::Destroy, _) => {
                        let Some(child_key) = action.target() else {
                            continue;
                        };

                        self.delete(target, vec![child_key]).await?;
                        children.retain(|c| c.key != Some(child_key));
                    }
                    (ActionKind::Skip, _) | (_, None) => {}
                }
            }

            associations.push((name.clone(), children));
        }

        Ok(Committed { key, associations })
    }
}
