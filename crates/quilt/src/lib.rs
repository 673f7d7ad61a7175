pub mod db;
pub use db::Db;

mod entity;
pub use entity::Entity;

pub mod nested;

pub use quilt_core::{
    bail, driver, err, record, schema, stmt, validation, Error, Result, SaveFailed,
};
