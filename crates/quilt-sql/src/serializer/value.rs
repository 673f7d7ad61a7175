use super::{Params, ToSql};

use quilt_core::stmt;

impl ToSql for &stmt::Value {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let placeholder = f.params.push(self);
        fmt!(f, placeholder)
    }
}
