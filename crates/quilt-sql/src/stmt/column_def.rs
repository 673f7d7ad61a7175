use quilt_core::{schema::Field, stmt};

#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub name: String,
    pub ty: stmt::Type,
    pub nullable: bool,
    pub unique: bool,

    /// True for the auto-incrementing integer primary key
    pub primary_key: bool,
}

impl ColumnDef {
    pub(crate) fn from_schema(field: &Field) -> ColumnDef {
        ColumnDef {
            name: field.name.clone(),
            ty: field.ty,
            nullable: field.nullable,
            unique: field.unique,
            primary_key: false,
        }
    }

    pub(crate) fn primary_key(name: &str) -> ColumnDef {
        ColumnDef {
            name: name.to_string(),
            ty: stmt::Type::I64,
            nullable: false,
            unique: false,
            primary_key: true,
        }
    }
}
