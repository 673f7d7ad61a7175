use super::Value;

/// A `WHERE` clause over a single column.
#[derive(Debug, Clone)]
pub enum Filter {
    /// `column = value`
    Eq { column: String, value: Value },

    /// `column IN (values...)`
    In { column: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Filter {
        Filter::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn in_list(column: impl Into<String>, values: Vec<Value>) -> Filter {
        Filter::In {
            column: column.into(),
            values,
        }
    }

    /// The filtered column.
    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::In { column, .. } => column,
        }
    }
}
