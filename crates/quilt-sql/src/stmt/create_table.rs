use super::*;

use quilt_core::schema::Model;

#[derive(Debug, Clone)]
pub struct CreateTable {
    /// Name of the table
    pub name: String,

    /// Column definitions, primary key first
    pub columns: Vec<ColumnDef>,
}

impl Statement {
    pub fn create_table(model: &Model) -> Self {
        let mut columns = vec![ColumnDef::primary_key(&model.primary_key)];
        columns.extend(model.fields.iter().map(ColumnDef::from_schema));

        CreateTable {
            name: model.table_name.clone(),
            columns,
        }
        .into()
    }
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
