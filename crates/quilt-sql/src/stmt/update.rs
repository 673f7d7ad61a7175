use super::*;

use quilt_core::schema::{Model, ModelId};

#[derive(Debug, Clone)]
pub struct Update {
    /// Table to update
    pub table: ModelId,

    /// Columns to assign
    pub assignments: Record,

    /// Which rows to update
    pub filter: Filter,
}

impl Statement {
    pub fn update_by_key(model: &Model, key: i64, assignments: Record) -> Self {
        Update {
            table: model.id,
            assignments,
            filter: Filter::eq(&model.primary_key, key),
        }
        .into()
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Self::Update(value)
    }
}
