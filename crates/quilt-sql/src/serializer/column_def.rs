use super::{Ident, Params, ToSql};

use crate::stmt;

impl ToSql for &stmt::ColumnDef {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let name = Ident(&self.name);

        fmt!(f, name " " self.ty);

        if self.primary_key {
            // SQLite only auto-increments a lone INTEGER PRIMARY KEY column
            fmt!(f, " PRIMARY KEY AUTOINCREMENT");
            return;
        }

        if !self.nullable {
            fmt!(f, " NOT NULL");
        }

        if self.unique {
            fmt!(f, " UNIQUE");
        }
    }
}
