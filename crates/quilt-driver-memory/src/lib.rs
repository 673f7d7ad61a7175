//! An in-process driver keeping every table in memory.
//!
//! Transactions are implemented by snapshotting the store on `Start` and
//! restoring it on `Rollback`. The driver can also be configured to report no
//! transaction support, which is how saves against non-transactional stores
//! are exercised.

mod store;
use store::Store;

use quilt_core::{
    async_trait,
    driver::{
        operation::{Operation, Transaction},
        Capability, Driver, Response,
    },
    record,
    schema::Schema,
    Error, Result,
};
use std::{borrow::Cow, sync::Arc};
use tracing::debug;
use url::Url;

#[derive(Debug, Clone)]
pub struct Memory {
    transactions: bool,
}

impl Memory {
    /// Create a new in-memory driver from a connection URL.
    ///
    /// Accepts `memory:` and `memory:?transactions=false`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url_str}")))?;

        if url.scheme() != "memory" {
            return Err(Error::invalid_connection_url(format!(
                "connection URL does not have a `memory` scheme; url={}",
                url_str
            )));
        }

        let mut transactions = true;

        for (key, value) in url.query_pairs() {
            match (&*key, &*value) {
                ("transactions", "true") => transactions = true,
                ("transactions", "false") => transactions = false,
                _ => {
                    return Err(Error::invalid_connection_url(format!(
                        "unsupported parameter `{key}={value}`; url={url_str}"
                    )))
                }
            }
        }

        Ok(Self { transactions })
    }

    /// A transactional in-memory database.
    pub fn transactional() -> Self {
        Self { transactions: true }
    }

    /// An in-memory database that reports no transaction support.
    pub fn non_transactional() -> Self {
        Self {
            transactions: false,
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::transactional()
    }
}

#[async_trait]
impl Driver for Memory {
    fn url(&self) -> Cow<'_, str> {
        if self.transactions {
            Cow::Borrowed("memory:")
        } else {
            Cow::Borrowed("memory:?transactions=false")
        }
    }

    fn capability(&self) -> &'static Capability {
        if self.transactions {
            &Capability::MEMORY
        } else {
            &Capability::MEMORY_NON_TRANSACTIONAL
        }
    }

    async fn connect(&self) -> Result<Box<dyn quilt_core::Connection>> {
        Ok(Box::new(Connection {
            capability: self.capability(),
            store: Store::default(),
            snapshot: None,
        }))
    }
}

#[derive(Debug)]
pub struct Connection {
    capability: &'static Capability,
    store: Store,

    /// State of the store when the open transaction started
    snapshot: Option<Store>,
}

#[async_trait]
impl quilt_core::driver::Connection for Connection {
    fn capability(&self) -> &'static Capability {
        self.capability
    }

    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> Result<Response> {
        debug!(?op, "memory exec");

        match op {
            Operation::Insert(op) => {
                let model = schema.model(op.model);
                let key = self.store.insert(model, op.values)?;
                Ok(Response::values(vec![record! { &model.primary_key => key }]))
            }
            Operation::UpdateByKey(op) => {
                let model = schema.model(op.model);
                let count = self.store.update(model, op.key, op.assignments)?;
                Ok(Response::count(count))
            }
            Operation::DeleteByKey(op) => {
                let model = schema.model(op.model);
                let count = self.store.delete(model, &op.keys)?;
                Ok(Response::count(count))
            }
            Operation::GetByKey(op) => {
                let model = schema.model(op.model);
                Ok(Response::values(self.store.get(model, op.key)?))
            }
            Operation::QueryByColumn(op) => {
                let model = schema.model(op.model);
                Ok(Response::values(
                    self.store.query(model, &op.column, &op.value)?,
                ))
            }
            Operation::Transaction(op) => {
                self.transaction(op)?;
                Ok(Response::count(0))
            }
        }
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        for model in &schema.models {
            self.store.create_table(model)?;
        }

        Ok(())
    }

    async fn reset_db(&mut self, _schema: &Schema) -> Result<()> {
        self.store.drop_tables();
        self.snapshot = None;
        Ok(())
    }
}

impl Connection {
    fn transaction(&mut self, op: Transaction) -> Result<()> {
        if !self.capability.transactions {
            return Err(Error::unsupported_feature(
                "transactions are disabled for this in-memory database",
            ));
        }

        match op {
            Transaction::Start => {
                if self.snapshot.is_some() {
                    return Err(Error::persistence_failed_msg(
                        "cannot start a transaction within a transaction",
                    ));
                }
                self.snapshot = Some(self.store.clone());
            }
            Transaction::Commit => {
                if self.snapshot.take().is_none() {
                    return Err(Error::persistence_failed_msg(
                        "cannot commit - no transaction is active",
                    ));
                }
            }
            Transaction::Rollback => match self.snapshot.take() {
                Some(snapshot) => self.store = snapshot,
                None => {
                    return Err(Error::persistence_failed_msg(
                        "cannot rollback - no transaction is active",
                    ))
                }
            },
        }

        Ok(())
    }
}
