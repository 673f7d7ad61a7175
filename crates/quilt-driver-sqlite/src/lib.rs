mod value;
pub(crate) use value::Value;

use quilt_core::{
    async_trait,
    driver::{
        operation::Operation,
        Capability, Driver, Response,
    },
    schema::{Model, Schema},
    stmt::{self, Record},
    Error, Result,
};
use quilt_sql as sql;
use rusqlite::Connection as RusqliteConnection;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::debug;
use url::Url;

#[derive(Debug)]
pub enum Sqlite {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Create a new SQLite driver with an arbitrary connection URL
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `sqlite` scheme; url={}",
                url_str
            )));
        }

        if url.path() == ":memory:" {
            Ok(Self::InMemory)
        } else {
            Ok(Self::File(PathBuf::from(url.path())))
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn url(&self) -> Cow<'_, str> {
        match self {
            Sqlite::InMemory => Cow::Borrowed("sqlite::memory:"),
            Sqlite::File(path) => Cow::Owned(format!("sqlite:{}", path.display())),
        }
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self) -> Result<Box<dyn quilt_core::Connection>> {
        let connection = match self {
            Sqlite::File(path) => Connection::open(path)?,
            Sqlite::InMemory => Connection::in_memory()?,
        };
        Ok(Box::new(connection))
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: RusqliteConnection,
}

impl Connection {
    pub fn in_memory() -> Result<Self> {
        let connection = RusqliteConnection::open_in_memory().map_err(Error::persistence_failed)?;

        Ok(Self { connection })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = RusqliteConnection::open(path).map_err(Error::persistence_failed)?;
        let sqlite = Self { connection };
        Ok(sqlite)
    }
}

#[async_trait]
impl quilt_core::driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        let (sql, model): (sql::Statement, &Model) = match op {
            Operation::Insert(op) => {
                let model = schema.model(op.model);
                (sql::Statement::insert(model, op.values), model)
            }
            Operation::UpdateByKey(op) => {
                let model = schema.model(op.model);
                (
                    sql::Statement::update_by_key(model, op.key, op.assignments),
                    model,
                )
            }
            Operation::DeleteByKey(op) => {
                let model = schema.model(op.model);
                if op.keys.is_empty() {
                    return Ok(Response::count(0));
                }
                (sql::Statement::delete_by_keys(model, &op.keys), model)
            }
            Operation::GetByKey(op) => {
                let model = schema.model(op.model);
                (sql::Statement::get_by_key(model, op.key), model)
            }
            Operation::QueryByColumn(op) => {
                let model = schema.model(op.model);
                (
                    sql::Statement::query_by_column(model, &op.column, op.value),
                    model,
                )
            }
            Operation::Transaction(op) => {
                let sql = sql::Serializer::sqlite(schema).serialize_transaction(&op);
                debug!(%sql, "sqlite transaction");
                self.connection
                    .execute(&sql, [])
                    .map_err(Error::persistence_failed)?;
                return Ok(Response::count(0));
            }
        };

        let mut params: Vec<stmt::Value> = vec![];
        let sql_str = sql::Serializer::sqlite(schema).serialize(&sql, &mut params);
        debug!(sql = %sql_str, params = params.len(), "sqlite exec");

        let mut stmt = self
            .connection
            .prepare_cached(&sql_str)
            .map_err(Error::persistence_failed)?;

        let params = params.into_iter().map(Value::from).collect::<Vec<_>>();

        let Some(columns) = sql.returning() else {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::persistence_failed)?;

            return Ok(Response::count(count as _));
        };

        // Column types drive how SQLite integers are read back
        let tys = columns
            .iter()
            .map(|column| {
                model
                    .field(column)
                    .map(|field| field.ty)
                    .unwrap_or(stmt::Type::I64)
            })
            .collect::<Vec<_>>();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::persistence_failed)?;

        let mut ret = vec![];

        loop {
            match rows.next() {
                Ok(Some(row)) => {
                    let mut record = Record::new();

                    for (index, (column, ty)) in columns.iter().zip(&tys).enumerate() {
                        record.insert(column, Value::from_sql(row, index, *ty)?.into_inner());
                    }

                    ret.push(record);
                }
                Ok(None) => break,
                Err(err) => {
                    return Err(Error::persistence_failed(err));
                }
            }
        }

        Ok(Response::values(ret))
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        for model in &schema.models {
            self.create_table(schema, model)?;
        }

        Ok(())
    }

    async fn reset_db(&mut self, schema: &Schema) -> Result<()> {
        let serializer = sql::Serializer::sqlite(schema);

        for model in &schema.models {
            let mut params: Vec<stmt::Value> = vec![];
            let stmt =
                serializer.serialize(&sql::Statement::drop_table_if_exists(model), &mut params);

            self.connection
                .execute(&stmt, [])
                .map_err(Error::persistence_failed)?;
        }

        Ok(())
    }
}

impl Connection {
    fn create_table(&mut self, schema: &Schema, model: &Model) -> Result<()> {
        let serializer = sql::Serializer::sqlite(schema);

        let mut params: Vec<stmt::Value> = vec![];
        let stmt = serializer.serialize(&sql::Statement::create_table(model), &mut params);
        debug!(sql = %stmt, "sqlite create table");

        self.connection
            .execute(&stmt, [])
            .map_err(Error::persistence_failed)?;

        Ok(())
    }
}
