use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Error, Result};

/// Coerced field value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    /// Label of an enum-typed field.
    Enum(String),
    DateTime(DateTime<Utc>),
    List(Vec<Value>),
    Record(Record),
}

impl Value {
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Enum(_) => "enum",
            Value::DateTime(_) => "datetime",
            Value::List(_) => "list",
            Value::Record(_) => "record",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Numeric view of ints and decimals.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Int(value) => Some(Decimal::from(*value)),
            Value::Decimal(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            Value::Enum(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::DateTime(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Render as JSON; decimals become strings so no digit is lost.
    pub fn to_json(&self) -> JsonValue {
        match self {
            Value::Null => JsonValue::Null,
            Value::Bool(value) => JsonValue::Bool(*value),
            Value::Int(value) => JsonValue::from(*value),
            Value::Decimal(value) => JsonValue::String(value.to_string()),
            Value::Text(value) | Value::Enum(value) => JsonValue::String(value.clone()),
            Value::DateTime(value) => {
                JsonValue::String(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::List(items) => JsonValue::Array(items.iter().map(Value::to_json).collect()),
            Value::Record(record) => record.to_json(),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Named, ordered set of field values.
///
/// Records have no mutators; a record handed out by the engine keeps the
/// values it was validated with.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    name: String,
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new(name: impl Into<String>, fields: Vec<(String, Value)>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn to_json(&self) -> JsonValue {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        JsonValue::Object(map)
    }

    pub fn bool(&self, field: &str) -> Result<bool> {
        self.required(field, "bool", Value::as_bool)
    }

    pub fn int(&self, field: &str) -> Result<i64> {
        self.required(field, "int", Value::as_int)
    }

    pub fn opt_int(&self, field: &str) -> Result<Option<i64>> {
        self.optional(field, "int", Value::as_int)
    }

    pub fn decimal(&self, field: &str) -> Result<Decimal> {
        self.required(field, "decimal", Value::as_decimal)
    }

    pub fn opt_decimal(&self, field: &str) -> Result<Option<Decimal>> {
        self.optional(field, "decimal", Value::as_decimal)
    }

    pub fn text(&self, field: &str) -> Result<&str> {
        self.required(field, "text", Value::as_text)
    }

    pub fn opt_text(&self, field: &str) -> Result<Option<&str>> {
        self.optional(field, "text", Value::as_text)
    }

    pub fn label(&self, field: &str) -> Result<&str> {
        self.required(field, "enum", Value::as_label)
    }

    pub fn datetime(&self, field: &str) -> Result<DateTime<Utc>> {
        self.required(field, "datetime", Value::as_datetime)
    }

    pub fn list(&self, field: &str) -> Result<&[Value]> {
        self.required(field, "list", Value::as_list)
    }

    pub fn record(&self, field: &str) -> Result<&Record> {
        self.required(field, "record", Value::as_record)
    }

    fn required<'a, T>(
        &'a self,
        field: &str,
        expected: &str,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<T> {
        let value = self
            .get(field)
            .ok_or_else(|| self.access_error(field, "field not present".to_string()))?;
        extract(value).ok_or_else(|| {
            self.access_error(field, format!("expected {expected}, found {}", value.kind()))
        })
    }

    fn optional<'a, T>(
        &'a self,
        field: &str,
        expected: &str,
        extract: impl Fn(&'a Value) -> Option<T>,
    ) -> Result<Option<T>> {
        match self.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(_) => self.required(field, expected, extract).map(Some),
        }
    }

    fn access_error(&self, field: &str, reason: String) -> Error {
        Error::FieldAccess {
            record: self.name.clone(),
            field: field.to_string(),
            reason,
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
