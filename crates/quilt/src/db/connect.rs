use crate::Result;

use quilt_core::{
    async_trait,
    driver::{Capability, Connection, Driver},
    Error,
};

use std::borrow::Cow;
use url::Url;

/// A driver selected by the scheme of a connection URL.
#[derive(Debug)]
pub struct Connect {
    driver: Box<dyn Driver>,
}

impl Connect {
    pub fn new(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|err| Error::invalid_connection_url(format!("{err}; url={url}")))?;

        let driver = match parsed.scheme() {
            "memory" => connect_memory(url)?,
            "sqlite" => connect_sqlite(url)?,
            scheme => {
                return Err(Error::invalid_connection_url(format!(
                    "unsupported database; scheme={scheme}; url={url}"
                )))
            }
        };

        Ok(Self { driver })
    }
}

#[async_trait]
impl Driver for Connect {
    fn url(&self) -> Cow<'_, str> {
        self.driver.url()
    }

    fn capability(&self) -> &'static Capability {
        self.driver.capability()
    }

    async fn connect(&self) -> Result<Box<dyn Connection>> {
        self.driver.connect().await
    }
}

#[cfg(feature = "memory")]
fn connect_memory(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(quilt_driver_memory::Memory::new(url)?))
}

#[cfg(not(feature = "memory"))]
fn connect_memory(_url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::invalid_connection_url("`memory` feature not enabled"))
}

#[cfg(feature = "sqlite")]
fn connect_sqlite(url: &str) -> Result<Box<dyn Driver>> {
    Ok(Box::new(quilt_driver_sqlite::Sqlite::new(url)?))
}

#[cfg(not(feature = "sqlite"))]
fn connect_sqlite(_url: &str) -> Result<Box<dyn Driver>> {
    Err(Error::invalid_connection_url("`sqlite` feature not enabled"))
}
