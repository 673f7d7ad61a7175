use super::*;

use crate::stmt::Value;

/// Reads every row whose `column` equals `value`, ordered by primary key.
#[derive(Debug, Clone)]
pub struct QueryByColumn {
    /// Which table to read from
    pub model: ModelId,

    /// Column to filter on
    pub column: String,

    /// Value the column must equal
    pub value: Value,
}

impl From<QueryByColumn> for Operation {
    fn from(value: QueryByColumn) -> Self {
        Self::QueryByColumn(value)
    }
}
