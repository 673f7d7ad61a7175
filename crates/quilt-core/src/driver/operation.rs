mod delete_by_key;
pub use delete_by_key::DeleteByKey;

mod get_by_key;
pub use get_by_key::GetByKey;

mod insert;
pub use insert::Insert;

mod query_by_column;
pub use query_by_column::QueryByColumn;

mod transaction;
pub use transaction::Transaction;

mod update_by_key;
pub use update_by_key::UpdateByKey;

use crate::schema::ModelId;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Create a new record, returning its assigned key.
    Insert(Insert),

    /// Delete records identified by the given keys.
    DeleteByKey(DeleteByKey),

    /// Get one record by its primary key.
    GetByKey(GetByKey),

    /// Query the table, filtering by one column's value.
    QueryByColumn(QueryByColumn),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// Update a record by the primary key
    UpdateByKey(UpdateByKey),
}

impl Operation {
    /// The model whose table the operation touches, if any.
    pub fn model(&self) -> Option<ModelId> {
        match self {
            Operation::Insert(op) => Some(op.model),
            Operation::DeleteByKey(op) => Some(op.model),
            Operation::GetByKey(op) => Some(op.model),
            Operation::QueryByColumn(op) => Some(op.model),
            Operation::UpdateByKey(op) => Some(op.model),
            Operation::Transaction(_) => None,
        }
    }

    pub fn is_transaction(&self) -> bool {
        matches!(self, Operation::Transaction(_))
    }

    /// Returns `true` for operations that change stored data.
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            Operation::Insert(_) | Operation::DeleteByKey(_) | Operation::UpdateByKey(_)
        )
    }
}
