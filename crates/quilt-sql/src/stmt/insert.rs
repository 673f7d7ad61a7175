use super::*;

use quilt_core::schema::{Model, ModelId};

#[derive(Debug, Clone)]
pub struct Insert {
    /// Table to insert into
    pub table: ModelId,

    /// Columns and the values assigned to them
    pub values: Record,

    /// Column returned for the inserted row, the primary key
    pub returning: String,
}

impl Statement {
    pub fn insert(model: &Model, values: Record) -> Self {
        Insert {
            table: model.id,
            values,
            returning: model.primary_key.clone(),
        }
        .into()
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
