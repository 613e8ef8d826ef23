//! Value Codec
//!
//! Converts between SQLite cells, client-supplied JSON scalars and the JSON
//! written back to the caller. All three directions go through [`SqlValue`],
//! a closed set of scalar shapes.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rusqlite::types::{Value as StoreValue, ValueRef};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use super::errors::GatewayError;

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
    Boolean(bool),
}

impl SqlValue {
    /// Decode a single driver cell. Text is taken lossily so a stray
    /// non-UTF-8 byte never fails a whole result set.
    pub fn from_ref(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(v) => SqlValue::Integer(v),
            ValueRef::Real(v) => SqlValue::Real(v),
            ValueRef::Text(text) => SqlValue::Text(String::from_utf8_lossy(text).into_owned()),
            ValueRef::Blob(bytes) => SqlValue::Blob(bytes.to_vec()),
        }
    }

    /// Decode a cell using its column's declared type. SQLite stores booleans
    /// as integers, so an integer in a `BOOLEAN`/`BOOL` column comes back as
    /// [`SqlValue::Boolean`]. Other cells decode as in [`SqlValue::from_ref`].
    pub fn from_column(value: ValueRef<'_>, decl_type: Option<&str>) -> Self {
        match value {
            ValueRef::Integer(v) if decl_type.is_some_and(is_boolean_decl) => {
                SqlValue::Boolean(v != 0)
            }
            _ => SqlValue::from_ref(value),
        }
    }
}

fn is_boolean_decl(decl_type: &str) -> bool {
    decl_type.eq_ignore_ascii_case("boolean") || decl_type.eq_ignore_ascii_case("bool")
}

impl TryFrom<Value> for SqlValue {
    type Error = GatewayError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(SqlValue::Null),
            Value::Bool(b) => Ok(SqlValue::Boolean(b)),
            Value::String(s) => Ok(SqlValue::Text(s)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(SqlValue::Integer(i))
                } else if let Some(f) = n.as_f64() {
                    Ok(SqlValue::Real(f))
                } else {
                    Err(GatewayError::Decode(format!(
                        "argument {} is not a representable number",
                        n
                    )))
                }
            }
            Value::Array(_) | Value::Object(_) => Err(GatewayError::Decode(
                "args must contain only scalars (string, number, boolean, null)".to_string(),
            )),
        }
    }
}

impl From<SqlValue> for StoreValue {
    fn from(value: SqlValue) -> Self {
        match value {
            SqlValue::Null => StoreValue::Null,
            SqlValue::Integer(v) => StoreValue::Integer(v),
            SqlValue::Real(v) => StoreValue::Real(v),
            SqlValue::Text(v) => StoreValue::Text(v),
            SqlValue::Blob(v) => StoreValue::Blob(v),
            SqlValue::Boolean(b) => StoreValue::Integer(i64::from(b)),
        }
    }
}

impl Serialize for SqlValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SqlValue::Null => serializer.serialize_none(),
            SqlValue::Integer(v) => serializer.serialize_i64(*v),
            SqlValue::Real(v) if v.is_finite() => serializer.serialize_f64(*v),
            SqlValue::Real(_) => serializer.serialize_none(),
            SqlValue::Text(v) => serializer.serialize_str(v),
            SqlValue::Blob(v) => serializer.serialize_str(&STANDARD.encode(v)),
            SqlValue::Boolean(v) => serializer.serialize_bool(*v),
        }
    }
}

/// Decode the `args` array of a request into bind values, in order.
pub fn decode_args(args: Vec<Value>) -> Result<Vec<SqlValue>, GatewayError> {
    args.into_iter().map(SqlValue::try_from).collect()
}

/// One result row: column name to value, in the order the store produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    columns: Vec<(String, SqlValue)>,
}

impl Row {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    /// Later columns with a repeated name overwrite earlier ones in place.
    pub fn insert(&mut self, name: impl Into<String>, value: SqlValue) {
        let name = name.into();
        match self.columns.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.columns
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (name, value) in &self.columns {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
