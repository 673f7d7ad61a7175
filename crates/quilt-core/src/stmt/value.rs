use super::Record;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// 64-bit floating point number
    F64(f64),

    /// Signed 64-bit integer
    I64(i64),

    /// A list of values
    List(Vec<Value>),

    /// Null value
    #[default]
    Null,

    /// An ordered field-name → value map
    Record(Record),

    /// String value
    String(String),
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    pub const fn is_list(&self) -> bool {
        matches!(self, Self::List(_))
    }

    /// Returns `true` for values a form would submit for an empty input:
    /// null, whitespace-only strings, and empty lists or records.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(v) => v.trim().is_empty(),
            Self::List(v) => v.is_empty(),
            Self::Record(v) => v.is_empty(),
            _ => false,
        }
    }

    /// Interprets the value as a boolean flag the way form inputs encode
    /// them: `true`, non-zero integers, and `"1"`, `"t"`, `"true"`, `"on"`,
    /// `"yes"` are truthy. Everything else is falsey.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(v) => *v,
            Self::I64(v) => *v != 0,
            Self::String(v) => matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "1" | "t" | "true" | "on" | "yes"
            ),
            _ => false,
        }
    }

    /// Interprets the value as a primary key. Integers and decimal strings
    /// are accepted, so `1` and `"1"` name the same record.
    pub fn to_key(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            Self::String(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            Self::I64(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(&**v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_record(&self) -> &Record {
        match self {
            Self::Record(record) => record,
            _ => panic!("expected record; actual={self:#?}"),
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// A short name for the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::F64(_) => "float",
            Self::I64(_) => "integer",
            Self::List(_) => "list",
            Self::Null => "null",
            Self::Record(_) => "record",
            Self::String(_) => "string",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Null => f.write_str("null"),
            Self::Record(record) => {
                f.write_str("{")?;
                for (i, (name, value)) in record.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                f.write_str("}")
            }
            Self::String(v) => f.write_str(v),
        }
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I64(src.into())
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_string())
    }
}

impl From<Record> for Value {
    fn from(src: Record) -> Self {
        Self::Record(src)
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Self {
        Self::List(src)
    }
}

impl From<Vec<Record>> for Value {
    fn from(src: Vec<Record>) -> Self {
        Self::List(src.into_iter().map(Value::Record).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Self {
        match src {
            Some(value) => value.into(),
            None => Self::Null,
        }
    }
}
