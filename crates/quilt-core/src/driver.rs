mod capability;
pub use capability::Capability;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{async_trait, schema::Schema};

use std::{borrow::Cow, fmt::Debug, sync::Arc};

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Returns the URL this driver is connecting to.
    fn url(&self) -> Cow<'_, str>;

    /// Describes the driver's capability, which informs the save orchestrator.
    fn capability(&self) -> &'static Capability;

    /// Creates a new connection to the database.
    async fn connect(&self) -> crate::Result<Box<dyn Connection>>;
}

#[async_trait]
pub trait Connection: Debug + Send + 'static {
    /// Describes the capability of the database behind this connection.
    fn capability(&self) -> &'static Capability;

    /// Execute a database operation
    async fn exec(&mut self, schema: &Arc<Schema>, op: Operation) -> crate::Result<Response>;

    /// Creates a table for every model in the schema.
    async fn push_schema(&mut self, schema: &Schema) -> crate::Result<()>;

    /// Drops every table of the schema.
    async fn reset_db(&mut self, schema: &Schema) -> crate::Result<()>;
}
