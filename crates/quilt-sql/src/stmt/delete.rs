use super::*;

use quilt_core::schema::{Model, ModelId};

#[derive(Debug, Clone)]
pub struct Delete {
    /// Table to delete from
    pub table: ModelId,

    /// Which rows to delete
    pub filter: Filter,
}

impl Statement {
    pub fn delete_by_keys(model: &Model, keys: &[i64]) -> Self {
        Delete {
            table: model.id,
            filter: Filter::in_list(
                &model.primary_key,
                keys.iter().copied().map(Value::I64).collect(),
            ),
        }
        .into()
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Self::Delete(value)
    }
}
