use super::{Connect, Db, Policy};
use crate::Result;

use quilt_core::{
    driver::Driver,
    schema::{self, ModelBuilder, NestedOptions},
};

use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct Builder {
    /// Schema builder
    core: schema::Builder,

    /// What saves do on databases without transactions
    non_transactional: Policy,
}

impl Builder {
    pub fn register(&mut self, model: ModelBuilder) -> &mut Self {
        self.core.register(model);
        self
    }

    /// Set the table name prefix for all tables
    pub fn table_name_prefix(&mut self, prefix: &str) -> &mut Self {
        self.core.table_name_prefix(prefix);
        self
    }

    /// Enables nested attributes for `relation` on `model`.
    pub fn nested_attributes(
        &mut self,
        model: &str,
        relation: &str,
        options: NestedOptions,
    ) -> Result<&mut Self> {
        self.core.nested_attributes(model, relation, options)?;
        Ok(self)
    }

    /// Sets how saves proceed when the database does not support
    /// transactions.
    pub fn non_transactional(&mut self, policy: Policy) -> &mut Self {
        self.non_transactional = policy;
        self
    }

    pub async fn connect(&mut self, url: &str) -> Result<Db> {
        self.build(Connect::new(url)?).await
    }

    pub async fn build(&mut self, driver: impl Driver) -> Result<Db> {
        let schema = std::mem::take(&mut self.core).build()?;
        let connection = driver.connect().await?;

        Ok(Db {
            schema: Arc::new(schema),
            driver: Arc::new(driver),
            connection: Arc::new(Mutex::new(connection)),
            non_transactional: self.non_transactional,
        })
    }
}
