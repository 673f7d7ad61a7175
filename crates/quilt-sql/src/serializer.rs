#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::Comma;

mod ident;
use ident::Ident;

mod params;
pub use params::{Params, Placeholder};

// Fragment serializers
mod column_def;
mod filter;
mod statement;
mod ty;
mod value;

use crate::stmt::Statement;

use quilt_core::{
    driver::operation::Transaction,
    schema::{ModelId, Schema},
};

/// Serialize a statement to a SQLite SQL string
#[derive(Debug)]
pub struct Serializer<'a> {
    /// Schema against which the statement is to be serialized
    schema: &'a Schema,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer<'a>,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to store parameters
    params: &'a mut T,
}

impl<'a> Serializer<'a> {
    pub fn sqlite(schema: &'a Schema) -> Serializer<'a> {
        Serializer { schema }
    }

    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> String {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
        };

        stmt.to_sql(&mut fmt);

        ret.push(';');
        ret
    }

    /// Serialize a transaction control operation to a SQL string.
    pub fn serialize_transaction(&self, op: &Transaction) -> String {
        match op {
            Transaction::Start => "BEGIN".to_string(),
            Transaction::Commit => "COMMIT".to_string(),
            Transaction::Rollback => "ROLLBACK".to_string(),
        }
    }

    fn table_name(&self, id: ModelId) -> Ident<&'a str> {
        Ident(&self.schema.model(id).table_name)
    }
}
