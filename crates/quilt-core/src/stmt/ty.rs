use super::Value;

/// The storage type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    /// Boolean value
    Bool,

    /// 64-bit floating point number
    F64,

    /// Signed 64-bit integer
    I64,

    /// String type
    String,
}

impl Type {
    /// Returns `true` if `value` is a non-null value of this type.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Type::Bool, Value::Bool(_))
                | (Type::F64, Value::F64(_))
                | (Type::I64, Value::I64(_))
                | (Type::String, Value::String(_))
        )
    }

    /// Converts form-encoded input into this type where the conversion is
    /// lossless. Blank strings become null for non-string types. Values that
    /// cannot be converted are returned unchanged so validation can report
    /// them.
    pub fn cast(&self, value: Value) -> Value {
        match (self, value) {
            (Type::Bool | Type::F64 | Type::I64, Value::String(v)) if v.trim().is_empty() => {
                Value::Null
            }
            (Type::I64, Value::String(v)) => match v.trim().parse() {
                Ok(parsed) => Value::I64(parsed),
                Err(_) => Value::String(v),
            },
            (Type::F64, Value::String(v)) => match v.trim().parse() {
                Ok(parsed) => Value::F64(parsed),
                Err(_) => Value::String(v),
            },
            (Type::F64, Value::I64(v)) => Value::F64(v as f64),
            (Type::Bool, Value::String(v)) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "t" | "true" | "on" | "yes" => Value::Bool(true),
                "0" | "f" | "false" | "off" | "no" => Value::Bool(false),
                _ => Value::String(v),
            },
            (Type::Bool, Value::I64(v @ (0 | 1))) => Value::Bool(v == 1),
            (Type::String, Value::I64(v)) => Value::String(v.to_string()),
            (_, value) => value,
        }
    }
}
