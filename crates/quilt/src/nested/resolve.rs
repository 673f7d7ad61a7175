use crate::Entity;

use quilt_core::{
    schema::{nested::DESTROY_MARKER, Model, NestedAttributes, Relation, Schema},
    stmt::{Record, Value},
    Error, Result,
};

use indexmap::IndexMap;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Insert a new child linked to the parent
    Create,

    /// Write merged attributes to an existing child
    Update,

    /// Delete an existing child
    Destroy,

    /// Ignore the mapping
    Skip,
}

/// What the next save does with one submitted child mapping.
#[derive(Debug, Clone)]
pub struct PendingAction {
    /// Index of the mapping in the sanitized payload
    position: usize,

    kind: ActionKind,

    /// Key of the existing child, for updates and destroys
    target: Option<i64>,

    /// The mapping as submitted
    attributes: Record,

    /// Child built (create) or merged (update) from the mapping, not yet
    /// persisted
    pub(crate) child: Option<Entity>,
}

impl PendingAction {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    pub fn target(&self) -> Option<i64> {
        self.target
    }

    pub fn attributes(&self) -> &Record {
        &self.attributes
    }

    /// The staged child of a create or update.
    pub fn child(&self) -> Option<&Entity> {
        self.child.as_ref()
    }
}

/// Resolves sanitized mappings against the relation's current children.
///
/// Produces exactly one action per mapping, in order:
///
/// * a mapping whose key matches a current child updates it, or destroys it
///   when the destroy marker is truthy and `allow_destroy` is set;
/// * a mapping whose key matches no current child fails with a stale
///   reference error;
/// * a mapping without a key creates a child, unless `reject_if` rejects it
///   or it is marked for destruction, in which case it is skipped.
///
/// With `update_only`, a has-one mapping without a key applies to the
/// current child instead of replacing it.
///
/// The relation's foreign key is never taken from a mapping; children stay
/// linked to the parent they were submitted through. Several mappings naming
/// the same child update it cumulatively.
pub fn resolve(
    schema: &Schema,
    relation: &Relation,
    config: &NestedAttributes,
    current: &[Entity],
    mappings: Vec<Record>,
) -> Result<Vec<PendingAction>> {
    let target = schema.model(relation.target);

    let existing: IndexMap<i64, &Entity> = current
        .iter()
        .filter_map(|child| child.key.map(|key| (key, child)))
        .collect();

    // Latest staged state of each child updated so far
    let mut staged: IndexMap<i64, Entity> = IndexMap::new();

    let mut actions = Vec::with_capacity(mappings.len());

    for (position, attributes) in mappings.into_iter().enumerate() {
        let marked = config.allow_destroy
            && attributes
                .get(DESTROY_MARKER)
                .is_some_and(Value::is_truthy);

        let identity = attributes
            .get(&target.primary_key)
            .filter(|value| !value.is_blank());

        let existing_child = match identity {
            Some(identity) => {
                let child = identity
                    .to_key()
                    .and_then(|key| existing.get(&key).copied())
                    .ok_or_else(|| Error::stale_reference(&relation.name, identity.to_string()))?;
                Some(child)
            }
            None if config.update_only => existing.values().next().copied(),
            None => None,
        };

        let action = match existing_child {
            Some(child) if marked => PendingAction {
                position,
                kind: ActionKind::Destroy,
                target: child.key,
                attributes,
                child: None,
            },
            Some(child) => {
                let mut merged = child
                    .key
                    .and_then(|key| staged.get(&key))
                    .unwrap_or(child)
                    .clone();
                merged
                    .attributes
                    .merge(&assignable(target, relation, &attributes)?);

                if let Some(key) = merged.key {
                    staged.insert(key, merged.clone());
                }

                PendingAction {
                    position,
                    kind: ActionKind::Update,
                    target: child.key,
                    attributes,
                    child: Some(merged),
                }
            }
            None if marked || config.reject_if.rejects(&attributes) => PendingAction {
                position,
                kind: ActionKind::Skip,
                target: None,
                attributes,
                child: None,
            },
            None => {
                let child = Entity::new(target.id, assignable(target, relation, &attributes)?);

                PendingAction {
                    position,
                    kind: ActionKind::Create,
                    target: None,
                    attributes,
                    child: Some(child),
                }
            }
        };

        debug!(
            relation = %relation.name,
            position,
            action = ?action.kind,
            target = ?action.target,
            "resolved nested action"
        );

        actions.push(action);
    }

    Ok(actions)
}

/// Casts a mapping onto the child model, leaving out the key, the destroy
/// marker and the foreign key.
fn assignable(target: &Model, relation: &Relation, attributes: &Record) -> Result<Record> {
    let mut attributes = attributes.clone();
    attributes.remove(DESTROY_MARKER);
    attributes.remove(&relation.foreign_key);
    target.cast(&attributes)
}
