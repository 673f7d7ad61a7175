#[macro_use]
mod macros;

pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError, SaveFailed};

pub mod schema;
pub use schema::Schema;

pub mod stmt;

pub mod validation;

/// A Result type alias that uses Quilt's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
