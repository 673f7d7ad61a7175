use super::*;

use quilt_core::schema::{Model, ModelId};

#[derive(Debug, Clone)]
pub struct Select {
    /// Table to read from
    pub table: ModelId,

    /// Returned columns, primary key first
    pub columns: Vec<String>,

    /// Which rows to return
    pub filter: Filter,

    /// Rows are returned in ascending order of this column
    pub order_by: String,
}

impl Statement {
    pub fn get_by_key(model: &Model, key: i64) -> Self {
        Self::select(model, Filter::eq(&model.primary_key, key))
    }

    pub fn query_by_column(model: &Model, column: &str, value: Value) -> Self {
        Self::select(model, Filter::eq(column, value))
    }

    fn select(model: &Model, filter: Filter) -> Self {
        let mut columns = vec![model.primary_key.clone()];
        columns.extend(model.fields.iter().map(|field| field.name.clone()));

        Select {
            table: model.id,
            columns,
            filter,
            order_by: model.primary_key.clone(),
        }
        .into()
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
