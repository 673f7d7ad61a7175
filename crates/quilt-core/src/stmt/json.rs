use super::{Record, Value};

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Self {
        match src {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Bool(v),
            serde_json::Value::Number(v) => match v.as_i64() {
                Some(v) => Value::I64(v),
                None => v.as_f64().map(Value::F64).unwrap_or(Value::Null),
            },
            serde_json::Value::String(v) => Value::String(v),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(fields) => Value::Record(
                fields
                    .into_iter()
                    .map(|(name, value)| (name, Value::from(value)))
                    .collect::<Record>(),
            ),
        }
    }
}
