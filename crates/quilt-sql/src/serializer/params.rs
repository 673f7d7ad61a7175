use super::{Formatter, ToSql};

use quilt_core::stmt;

pub trait Params {
    fn push(&mut self, param: &stmt::Value) -> Placeholder;
}

/// A 1-based positional parameter, serialized as `?N`.
pub struct Placeholder(pub usize);

impl Params for Vec<stmt::Value> {
    fn push(&mut self, value: &stmt::Value) -> Placeholder {
        self.push(value.clone());
        Placeholder(self.len())
    }
}

impl ToSql for Placeholder {
    fn to_sql<T: Params>(self, f: &mut Formatter<'_, T>) {
        f.dst.push('?');
        f.dst.push_str(&self.0.to_string());
    }
}
