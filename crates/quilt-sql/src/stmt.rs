mod column_def;
pub use column_def::ColumnDef;

mod create_table;
pub use create_table::CreateTable;

mod delete;
pub use delete::Delete;

mod drop_table;
pub use drop_table::DropTable;

mod filter;
pub use filter::Filter;

mod insert;
pub use insert::Insert;

mod select;
pub use select::Select;

mod update;
pub use update::Update;

pub use quilt_core::stmt::*;

#[derive(Debug, Clone)]
pub enum Statement {
    CreateTable(CreateTable),
    DropTable(DropTable),
    Delete(Delete),
    Insert(Insert),
    Select(Select),
    Update(Update),
}

impl Statement {
    pub fn is_update(&self) -> bool {
        matches!(self, Statement::Update(_))
    }

    /// Returns the names of the columns the statement returns, if it returns
    /// rows.
    pub fn returning(&self) -> Option<&[String]> {
        match self {
            Statement::Insert(insert) => Some(std::slice::from_ref(&insert.returning)),
            Statement::Select(select) => Some(&select.columns),
            _ => None,
        }
    }
}
