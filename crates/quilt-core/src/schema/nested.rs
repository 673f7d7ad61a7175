//! Nested attributes configuration.
//!
//! [`NestedOptions`] is what callers register for a relation. Registration
//! resolves it against the parent model into a [`NestedAttributes`], which is
//! stored on the [`Relation`](super::Relation) and never changes afterwards.

use super::{Model, RelationKind};
use crate::{stmt::Record, Error, Result};

use serde::Deserialize;
use std::{fmt, sync::Arc};

/// Field marking a submitted child for removal.
pub const DESTROY_MARKER: &str = "_destroy";

/// Name of the built-in guard rejecting mappings whose values are all blank.
pub const ALL_BLANK: &str = "all_blank";

/// A predicate over one submitted child mapping.
pub type Predicate = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// The `reject_if` option as supplied at registration.
#[derive(Clone, Default)]
pub enum RejectIf {
    /// Never reject
    #[default]
    None,

    /// A predicate registered on the parent model under this name
    Named(String),

    /// An inline predicate
    Callable(Predicate),
}

/// Options accepted when registering nested attributes for a relation.
#[derive(Clone, Default)]
pub struct NestedOptions {
    allow_destroy: bool,
    reject_if: RejectIf,
    limit: Option<usize>,
    update_only: bool,
}

/// The resolved `reject_if` guard.
#[derive(Clone, Default)]
pub enum Guard {
    #[default]
    None,

    Named {
        name: String,
        predicate: Predicate,
    },

    Callable(Predicate),
}

/// Nested attributes configuration of one relation.
#[derive(Debug, Clone, Default)]
pub struct NestedAttributes {
    /// When `true`, a truthy destroy marker removes the matching child
    pub allow_destroy: bool,

    /// Guard deciding whether a new-record mapping is silently skipped
    pub reject_if: Guard,

    /// Maximum number of mappings a has-many payload may hold
    pub limit: Option<usize>,

    /// Has-one only: mappings without a key update the existing child
    pub update_only: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    #[serde(default)]
    allow_destroy: bool,

    #[serde(default)]
    reject_if: Option<String>,

    #[serde(default)]
    limit: Option<usize>,

    #[serde(default)]
    update_only: bool,
}

impl RejectIf {
    pub fn named(name: impl Into<String>) -> RejectIf {
        RejectIf::Named(name.into())
    }

    pub fn callable(f: impl Fn(&Record) -> bool + Send + Sync + 'static) -> RejectIf {
        RejectIf::Callable(Arc::new(f))
    }

    /// Rejects mappings whose values are all blank, ignoring the destroy
    /// marker.
    pub fn all_blank() -> RejectIf {
        RejectIf::named(ALL_BLANK)
    }
}

impl NestedOptions {
    pub fn new() -> NestedOptions {
        NestedOptions::default()
    }

    /// Parses options from a JSON object.
    ///
    /// Accepts the keys `allow_destroy`, `reject_if` (a predicate name),
    /// `limit` and `update_only`. Any other key, or a value of the wrong
    /// type, fails with an invalid options error.
    pub fn from_json(value: serde_json::Value) -> Result<NestedOptions> {
        let raw: RawOptions =
            serde_json::from_value(value).map_err(|err| Error::invalid_options(err.to_string()))?;

        Ok(NestedOptions {
            allow_destroy: raw.allow_destroy,
            reject_if: raw.reject_if.map(RejectIf::Named).unwrap_or_default(),
            limit: raw.limit,
            update_only: raw.update_only,
        })
    }

    pub fn allow_destroy(mut self, allow_destroy: bool) -> Self {
        self.allow_destroy = allow_destroy;
        self
    }

    pub fn reject_if(mut self, reject_if: RejectIf) -> Self {
        self.reject_if = reject_if;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn update_only(mut self, update_only: bool) -> Self {
        self.update_only = update_only;
        self
    }

    /// Resolves the options against the parent model and the relation's
    /// cardinality.
    pub(crate) fn resolve(
        self,
        parent: &Model,
        relation: &str,
        kind: RelationKind,
    ) -> Result<NestedAttributes> {
        if self.limit.is_some() && kind == RelationKind::HasOne {
            return Err(Error::invalid_options(format!(
                "`limit` only applies to has-many relations; `{}.{}` is has-one",
                parent.name, relation
            )));
        }

        if self.update_only && kind == RelationKind::HasMany {
            return Err(Error::invalid_options(format!(
                "`update_only` only applies to has-one relations; `{}.{}` is has-many",
                parent.name, relation
            )));
        }

        let reject_if = match self.reject_if {
            RejectIf::None => Guard::None,
            RejectIf::Callable(predicate) => Guard::Callable(predicate),
            RejectIf::Named(name) => match parent.predicate(&name) {
                Some(predicate) => Guard::Named {
                    name,
                    predicate: predicate.clone(),
                },
                None if name == ALL_BLANK => Guard::Named {
                    name,
                    predicate: Arc::new(all_blank),
                },
                None => {
                    return Err(Error::invalid_options(format!(
                        "`reject_if` names `{}`, which is not a predicate of model `{}`",
                        name, parent.name
                    )))
                }
            },
        };

        Ok(NestedAttributes {
            allow_destroy: self.allow_destroy,
            reject_if,
            limit: self.limit,
            update_only: self.update_only,
        })
    }
}

impl Guard {
    /// Returns `true` when the guard rejects `attributes`.
    pub fn rejects(&self, attributes: &Record) -> bool {
        match self {
            Guard::None => false,
            Guard::Named { predicate, .. } => predicate(attributes),
            Guard::Callable(predicate) => predicate(attributes),
        }
    }
}

fn all_blank(attributes: &Record) -> bool {
    attributes
        .iter()
        .all(|(name, value)| name == DESTROY_MARKER || value.is_blank())
}

impl fmt::Debug for RejectIf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectIf::None => f.write_str("None"),
            RejectIf::Named(name) => f.debug_tuple("Named").field(name).finish(),
            RejectIf::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

impl fmt::Debug for NestedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NestedOptions")
            .field("allow_destroy", &self.allow_destroy)
            .field("reject_if", &self.reject_if)
            .field("limit", &self.limit)
            .field("update_only", &self.update_only)
            .finish()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guard::None => f.write_str("None"),
            Guard::Named { name, .. } => f.debug_tuple("Named").field(name).finish(),
            Guard::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}
