use super::{Params, ToSql};

use quilt_core::stmt;

impl ToSql for stmt::Type {
    fn to_sql<T: Params>(self, f: &mut super::Formatter<'_, T>) {
        fmt!(
            f,
            match self {
                stmt::Type::Bool => "BOOLEAN",
                stmt::Type::F64 => "REAL",
                stmt::Type::I64 => "INTEGER",
                stmt::Type::String => "TEXT",
            }
        );
    }
}
