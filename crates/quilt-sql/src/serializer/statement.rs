use super::{Comma, Ident, Params, ToSql};

use crate::stmt::{self, Statement};

/// `"column" = ?N`
struct Assignment<'a>(&'a str, &'a stmt::Value);

impl ToSql for &Statement {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let name = Ident(&self.name);
        let columns = Comma(&self.columns);

        fmt!(f, "CREATE TABLE " name " (" columns ")");
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let name = Ident(&self.name);
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };

        fmt!(f, "DROP TABLE " if_exists name);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table = f.serializer.table_name(self.table);
        let filter = &self.filter;

        fmt!(f, "DELETE FROM " table " WHERE " filter);
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table = f.serializer.table_name(self.table);
        let returning = Ident(&self.returning);

        if self.values.is_empty() {
            fmt!(f, "INSERT INTO " table " DEFAULT VALUES RETURNING " returning);
            return;
        }

        let columns = Comma(self.values.keys().map(Ident));
        let values = Comma(self.values.values());

        fmt!(
            f, "INSERT INTO " table " (" columns ") VALUES (" values ") RETURNING " returning
        );
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table = f.serializer.table_name(self.table);
        let columns = Comma(self.columns.iter().map(Ident));
        let filter = &self.filter;
        let order_by = Ident(&self.order_by);

        fmt!(
            f, "SELECT " columns " FROM " table " WHERE " filter " ORDER BY " order_by
        );
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table = f.serializer.table_name(self.table);

        fmt!(f, "UPDATE " table " SET ");

        if self.assignments.is_empty() {
            // Keep the statement well-formed; the row count still reports
            // whether the row exists.
            let column = Ident(self.filter.column());
            let same = Ident(self.filter.column());
            fmt!(f, column " = " same);
        } else {
            let assignments = Comma(
                self.assignments
                    .iter()
                    .map(|(column, value)| Assignment(column, value)),
            );
            fmt!(f, assignments);
        }

        let filter = &self.filter;
        fmt!(f, " WHERE " filter);
    }
}

impl ToSql for Assignment<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let column = Ident(self.0);
        fmt!(f, column " = " self.1);
    }
}
