use super::*;

#[derive(Debug, Clone)]
pub struct GetByKey {
    /// Which table to read from
    pub model: ModelId,

    /// The primary key of the row
    pub key: i64,
}

impl From<GetByKey> for Operation {
    fn from(value: GetByKey) -> Self {
        Self::GetByKey(value)
    }
}
