use quilt_core::{
    stmt::{self, Value as CoreValue},
    Error, Result,
};
use rusqlite::{
    types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef},
    Row,
};

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts this SQLite driver value into the core Quilt value.
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Converts a SQLite value within a row to a Quilt value.
    pub fn from_sql(row: &Row, index: usize, ty: stmt::Type) -> Result<Self> {
        let value: SqlValue = row.get(index).map_err(Error::persistence_failed)?;

        let core_value = match value {
            SqlValue::Null => stmt::Value::Null,
            SqlValue::Integer(value) => match ty {
                stmt::Type::Bool => stmt::Value::Bool(value != 0),
                stmt::Type::F64 => stmt::Value::F64(value as f64),
                _ => stmt::Value::I64(value),
            },
            SqlValue::Real(value) => stmt::Value::F64(value),
            SqlValue::Text(value) => stmt::Value::String(value),
            SqlValue::Blob(_) => {
                return Err(Error::invalid_result(format!(
                    "unexpected BLOB in column {index}"
                )))
            }
        };

        Ok(Value(core_value))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        use stmt::Value;

        match &self.0 {
            Value::Bool(true) => Ok(ToSqlOutput::Owned(SqlValue::Integer(1))),
            Value::Bool(false) => Ok(ToSqlOutput::Owned(SqlValue::Integer(0))),
            Value::I64(v) => Ok(ToSqlOutput::Owned(SqlValue::Integer(*v))),
            Value::F64(v) => Ok(ToSqlOutput::Owned(SqlValue::Real(*v))),
            Value::String(v) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(v.as_bytes()))),
            Value::Null => Ok(ToSqlOutput::Owned(SqlValue::Null)),
            value => Err(rusqlite::Error::ToSqlConversionFailure(
                format!("cannot bind a {} as a SQL parameter", value.kind_name()).into(),
            )),
        }
    }
}
