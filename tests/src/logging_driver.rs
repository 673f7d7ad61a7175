use quilt_core::{
    async_trait,
    driver::{Capability, Connection, Driver, Operation, Response},
    schema::Schema,
    Result,
};
use std::{
    borrow::Cow,
    sync::{Arc, Mutex},
};

/// A driver wrapper that logs all operations for testing purposes
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Log of all operations executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

impl LoggingDriver {
    pub fn new(driver: Box<dyn Driver>) -> Self {
        Self {
            inner: driver,
            ops_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn url(&self) -> Cow<'_, str> {
        self.inner.url()
    }

    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect().await?,
            ops_log: self.ops_log_handle(),
        }))
    }
}

/// An executed operation and its outcome.
#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,

    /// The response, or the error message when the operation failed
    pub response: std::result::Result<Response, String>,
}

#[derive(Debug)]
pub struct LoggingConnection {
    /// The underlying connection that actually executes operations
    inner: Box<dyn Connection>,

    ops_log: Arc<Mutex<Vec<DriverOp>>>,
}

#[async_trait]
impl Connection for LoggingConnection {
    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn exec(&mut self, schema: &Arc<Schema>, operation: Operation) -> Result<Response> {
        let result = self.inner.exec(schema, operation.clone()).await;

        let response = match &result {
            Ok(response) => Ok(response.clone()),
            Err(err) => Err(err.to_string()),
        };

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation,
                response,
            });

        result
    }

    async fn push_schema(&mut self, schema: &Schema) -> Result<()> {
        self.inner.push_schema(schema).await
    }

    async fn reset_db(&mut self, schema: &Schema) -> Result<()> {
        self.inner.reset_db(schema).await
    }
}
