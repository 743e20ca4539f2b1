use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(pub String);

impl From<&str> for RowKey {
    fn from(value: &str) -> Self {
        RowKey(value.to_string())
    }
}

impl From<i64> for RowKey {
    fn from(value: i64) -> Self {
        RowKey(value.to_string())
    }
}

impl std::fmt::Display for RowKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub fields: Map<String, Value>,
}

impl Row {
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Row { fields }),
            _ => None,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field).filter(|value| !value.is_null())
    }

    /// Numbers and strings both count as keys; backends mix them for `id`.
    pub fn key(&self, key_field: &str) -> Option<RowKey> {
        match self.get(key_field)? {
            Value::String(text) => Some(RowKey(text.clone())),
            Value::Number(number) => Some(RowKey(number.to_string())),
            _ => None,
        }
    }

    pub fn text(&self, field: &str) -> String {
        match self.get(field) {
            Some(Value::String(text)) => text.clone(),
            Some(Value::Bool(flag)) => flag.to_string(),
            Some(Value::Number(number)) => number.to_string(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }

    pub fn number(&self, field: &str) -> f64 {
        match self.get(field) {
            Some(Value::Number(number)) => number.as_f64().unwrap_or(0.0),
            Some(Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.0),
            Some(Value::Bool(flag)) => f64::from(u8::from(*flag)),
            _ => 0.0,
        }
    }

    /// Backends send booleans as `true`, `1` or `"1"`.
    pub fn flag(&self, field: &str) -> bool {
        match self.get(field) {
            Some(Value::Bool(flag)) => *flag,
            Some(Value::Number(number)) => number.as_i64().unwrap_or(0) != 0,
            Some(Value::String(text)) => matches!(text.trim(), "1" | "true"),
            _ => false,
        }
    }

    pub fn patch(&mut self, partial: &Map<String, Value>) {
        for (field, value) in partial {
            self.fields.insert(field.clone(), value.clone());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResourcePage {
    pub rows: Vec<Row>,
    pub total_count: u64,
    /// Set when a client-paginated fetch received fewer rows than the server reported.
    pub truncated: bool,
}

impl ResourcePage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn find(&self, key_field: &str, key: &RowKey) -> Option<&Row> {
        self.rows
            .iter()
            .find(|row| row.key(key_field).as_ref() == Some(key))
    }
}
