use crate::{stmt::Record, Error, Result};

#[derive(Debug, Clone)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug, Clone)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Operation result, as a list of rows
    Values(Vec<Record>),
}

impl Response {
    pub fn count(count: u64) -> Self {
        Self {
            rows: Rows::Count(count),
        }
    }

    pub fn values(values: Vec<Record>) -> Self {
        Self {
            rows: Rows::Values(values),
        }
    }

    pub fn empty_values() -> Self {
        Self::values(vec![])
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Self::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Self::Values(_))
    }

    pub fn into_count(self) -> Result<u64> {
        match self {
            Rows::Count(count) => Ok(count),
            Rows::Values(_) => Err(Error::invalid_result("expected a row count, got rows")),
        }
    }

    pub fn into_values(self) -> Result<Vec<Record>> {
        match self {
            Rows::Values(values) => Ok(values),
            Rows::Count(_) => Err(Error::invalid_result("expected rows, got a row count")),
        }
    }
}
