use super::{Comma, Ident, Params, ToSql};

use crate::stmt::Filter;

impl ToSql for &Filter {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            Filter::Eq { column, value } => {
                let column = Ident(column);
                fmt!(f, column " = " value);
            }
            Filter::In { column, values } => {
                let column = Ident(column);
                let values = Comma(values);
                fmt!(f, column " IN (" values ")");
            }
        }
    }
}
