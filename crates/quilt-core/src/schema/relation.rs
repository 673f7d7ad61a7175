use super::{Model, ModelId, NestedAttributes, Schema};

/// The cardinality of a relation from the parent's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    HasOne,
    HasMany,
}

/// A parent → child association.
///
/// The child model stores the parent's primary key in `foreign_key`.
#[derive(Debug)]
pub struct Relation {
    /// Name of the relation on the parent
    pub name: String,

    pub kind: RelationKind,

    /// Associated (child) model
    pub target: ModelId,

    /// Field on the child holding the parent's key
    pub foreign_key: String,

    /// Set when nested attributes were registered for this relation
    pub nested: Option<NestedAttributes>,
}

impl Relation {
    pub fn target<'a>(&self, schema: &'a Schema) -> &'a Model {
        schema.model(self.target)
    }

    pub fn is_has_many(&self) -> bool {
        matches!(self.kind, RelationKind::HasMany)
    }

    pub fn is_has_one(&self) -> bool {
        matches!(self.kind, RelationKind::HasOne)
    }

    pub fn nested_attributes(&self) -> Option<&NestedAttributes> {
        self.nested.as_ref()
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::HasOne => f.write_str("has-one"),
            RelationKind::HasMany => f.write_str("has-many"),
        }
    }
}
