use quilt_core::{
    schema::{Model, ModelId},
    stmt::{Record, Value},
    Error, Result,
};

use indexmap::IndexMap;
use std::collections::BTreeMap;

/// Every table of one in-memory database.
#[derive(Debug, Clone, Default)]
pub(crate) struct Store {
    tables: IndexMap<ModelId, Table>,
}

#[derive(Debug, Clone, Default)]
struct Table {
    /// Last assigned primary key
    last_key: i64,

    rows: BTreeMap<i64, Record>,
}

impl Store {
    pub(crate) fn create_table(&mut self, model: &Model) -> Result<()> {
        if self.tables.contains_key(&model.id) {
            return Err(Error::persistence_failed_msg(format!(
                "table {} already exists",
                model.table_name
            )));
        }

        self.tables.insert(model.id, Table::default());
        Ok(())
    }

    pub(crate) fn drop_tables(&mut self) {
        self.tables.clear();
    }

    pub(crate) fn insert(&mut self, model: &Model, values: Record) -> Result<i64> {
        let row = Self::row(model, values)?;
        let table = self.table_mut(model)?;
        Self::check_unique(model, table, None, &row)?;

        table.last_key += 1;
        let key = table.last_key;
        table.rows.insert(key, row);
        Ok(key)
    }

    pub(crate) fn update(&mut self, model: &Model, key: i64, assignments: Record) -> Result<u64> {
        let table = self.table_mut(model)?;

        let Some(current) = table.rows.get(&key) else {
            return Ok(0);
        };

        let mut row = current.clone();
        for (name, value) in assignments {
            row.insert(name, value);
        }
        let row = Self::row(model, row)?;
        Self::check_unique(model, table, Some(key), &row)?;

        table.rows.insert(key, row);
        Ok(1)
    }

    pub(crate) fn delete(&mut self, model: &Model, keys: &[i64]) -> Result<u64> {
        let table = self.table_mut(model)?;

        let mut count = 0;
        for key in keys {
            if table.rows.remove(key).is_some() {
                count += 1;
            }
        }
        Ok(count)
    }

    pub(crate) fn get(&self, model: &Model, key: i64) -> Result<Vec<Record>> {
        let table = self.table(model)?;

        Ok(table
            .rows
            .get(&key)
            .map(|row| Self::with_key(model, key, row))
            .into_iter()
            .collect())
    }

    pub(crate) fn query(&self, model: &Model, column: &str, value: &Value) -> Result<Vec<Record>> {
        let table = self.table(model)?;

        Ok(table
            .rows
            .iter()
            .filter(|(key, row)| {
                if column == model.primary_key {
                    value.to_key() == Some(**key)
                } else {
                    !value.is_null() && row.get(column) == Some(value)
                }
            })
            .map(|(key, row)| Self::with_key(model, *key, row))
            .collect())
    }

    fn table(&self, model: &Model) -> Result<&Table> {
        self.tables
            .get(&model.id)
            .ok_or_else(|| no_such_table(model))
    }

    fn table_mut(&mut self, model: &Model) -> Result<&mut Table> {
        self.tables
            .get_mut(&model.id)
            .ok_or_else(|| no_such_table(model))
    }

    /// Builds a full row, with every field of the model, from `values`.
    fn row(model: &Model, mut values: Record) -> Result<Record> {
        let mut row = Record::new();

        for field in &model.fields {
            let value = values.remove(&field.name).unwrap_or_default();

            if value.is_null() && !field.nullable {
                return Err(Error::persistence_failed_msg(format!(
                    "NOT NULL constraint failed: {}.{}",
                    model.table_name, field.name
                )));
            }

            row.insert(&field.name, value);
        }

        if let Some(name) = values.keys().next() {
            return Err(Error::persistence_failed_msg(format!(
                "table {} has no column named {}",
                model.table_name, name
            )));
        }

        Ok(row)
    }

    fn check_unique(model: &Model, table: &Table, skip: Option<i64>, row: &Record) -> Result<()> {
        for field in model.fields.iter().filter(|field| field.unique) {
            let Some(value) = row.get(&field.name).filter(|value| !value.is_null()) else {
                continue;
            };

            let taken = table
                .rows
                .iter()
                .filter(|(key, _)| Some(**key) != skip)
                .any(|(_, other)| other.get(&field.name) == Some(value));

            if taken {
                return Err(Error::persistence_failed_msg(format!(
                    "UNIQUE constraint failed: {}.{}",
                    model.table_name, field.name
                )));
            }
        }

        Ok(())
    }

    fn with_key(model: &Model, key: i64, row: &Record) -> Record {
        let mut ret = Record::new();
        ret.insert(&model.primary_key, key);
        ret.merge(row);
        ret
    }
}

fn no_such_table(model: &Model) -> Error {
    Error::persistence_failed_msg(format!("no such table: {}", model.table_name))
}
