use super::*;

use crate::stmt::Record;

/// Inserts one row. The driver assigns the primary key and responds with a
/// single row holding it.
#[derive(Debug, Clone)]
pub struct Insert {
    /// Which table to insert into
    pub model: ModelId,

    /// Column values, excluding the primary key
    pub values: Record,
}

impl From<Insert> for Operation {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
