use crate::dict::{DictError, Result};
use hashlink::LinkedHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reserved identity field assigned when a record is created.
pub const ID_FIELD: &str = "_id";
/// Reserved creation timestamp field.
pub const CREATE_TIME_FIELD: &str = "createTime";
/// Format used for `createTime` values.
pub const CREATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn is_reserved(key: &str) -> bool {
    key == ID_FIELD || key == CREATE_TIME_FIELD
}

/// A single scalar cell value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

impl FieldValue {
    /// Coerce an arbitrary JSON value into a cell. Nested arrays and objects
    /// are kept as their compact JSON text.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(b),
            serde_json::Value::Number(n) => FieldValue::Number(n),
            serde_json::Value::String(s) => FieldValue::Text(s),
            other => FieldValue::Text(other.to_string()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => Ok(()),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value.into())
    }
}

/// An ordered mapping of field names to values. Key order is insertion order
/// and survives a trip through the store.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(LinkedHashMap<String, FieldValue>);

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.get(key)
    }

    /// Display text of `key`, or an empty string when the field is absent.
    pub fn text(&self, key: &str) -> String {
        self.0.get(key).map(ToString::to_string).unwrap_or_default()
    }

    /// Insert or replace a field. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.0.get_mut(&key) {
            *slot = value;
        } else {
            self.0.insert(key, value);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Fields other than `_id` and `createTime`, in record order.
    pub fn data_fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.iter().filter(|(k, _)| !is_reserved(k))
    }

    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(FieldValue::as_text)
    }

    pub fn create_time(&self) -> Option<&str> {
        self.0.get(CREATE_TIME_FIELD).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// Parse the text typed into the entry form. The payload must be a JSON
/// array of objects; each object becomes one record without reserved fields.
pub fn parse_entry(json: &str) -> Result<Vec<Record>> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| DictError::InvalidJson(e.to_string()))?;
    let serde_json::Value::Array(items) = value else {
        return Err(DictError::NotAnArray);
    };
    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            serde_json::Value::Object(map) => Ok(map
                .into_iter()
                .filter(|(k, _)| !is_reserved(k))
                .map(|(k, v)| (k, FieldValue::from_json(v)))
                .collect()),
            _ => Err(DictError::NotAnObject(idx)),
        })
        .collect()
}
