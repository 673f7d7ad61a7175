use super::*;

use crate::stmt::Record;

#[derive(Debug, Clone)]
pub struct UpdateByKey {
    /// Which table to update
    pub model: ModelId,

    /// The primary key of the row to update
    pub key: i64,

    /// Columns to assign
    pub assignments: Record,
}

impl From<UpdateByKey> for Operation {
    fn from(value: UpdateByKey) -> Self {
        Self::UpdateByKey(value)
    }
}
