use super::*;

#[derive(Debug, Clone)]
pub struct DeleteByKey {
    /// Which table to delete from
    pub model: ModelId,

    /// Which keys to delete
    pub keys: Vec<i64>,
}

impl From<DeleteByKey> for Operation {
    fn from(value: DeleteByKey) -> Self {
        Self::DeleteByKey(value)
    }
}
