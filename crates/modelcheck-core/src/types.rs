use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::spec::RecordSpec;
use crate::value::{Record, Value};

/// Declared type of a field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum FieldType {
    Bool,
    Int,
    /// Exact decimal number, used for prices and rates.
    Decimal,
    Text,
    /// UTC timestamp.
    DateTime,
    /// Text restricted to a closed label set.
    Enum(EnumSpec),
    List(Box<FieldType>),
    /// Nested record validated with its own spec.
    Record(Arc<RecordSpec>),
    /// Accepts `null` in addition to the inner type.
    Optional(Box<FieldType>),
}

impl FieldType {
    pub fn list(inner: FieldType) -> Self {
        FieldType::List(Box::new(inner))
    }

    pub fn optional(inner: FieldType) -> Self {
        FieldType::Optional(Box::new(inner))
    }

    pub fn record(spec: RecordSpec) -> Self {
        FieldType::Record(Arc::new(spec))
    }

    /// Type with any `Optional` wrapper removed.
    pub fn base(&self) -> &FieldType {
        match self {
            FieldType::Optional(inner) => inner.base(),
            other => other,
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, FieldType::Optional(_))
    }

    /// Short human-readable type name, e.g. `list[order_item]`.
    pub fn name(&self) -> String {
        match self {
            FieldType::Bool => "bool".to_string(),
            FieldType::Int => "int".to_string(),
            FieldType::Decimal => "decimal".to_string(),
            FieldType::Text => "text".to_string(),
            FieldType::DateTime => "datetime".to_string(),
            FieldType::Enum(spec) => spec.name.clone(),
            FieldType::List(inner) => format!("list[{}]", inner.name()),
            FieldType::Record(spec) => spec.name().to_string(),
            FieldType::Optional(inner) => format!("optional[{}]", inner.name()),
        }
    }

    /// Structural check used for defaults and validator output.
    ///
    /// Enum values must be members of the label set; no other constraint is
    /// considered.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldType::Optional(_), Value::Null) => true,
            (FieldType::Optional(inner), other) => inner.accepts(other),
            (FieldType::Bool, Value::Bool(_))
            | (FieldType::Int, Value::Int(_))
            | (FieldType::Decimal, Value::Decimal(_))
            | (FieldType::Text, Value::Text(_))
            | (FieldType::DateTime, Value::DateTime(_)) => true,
            (FieldType::Enum(spec), Value::Enum(label)) => spec.contains(label),
            (FieldType::List(inner), Value::List(items)) => {
                items.iter().all(|item| inner.accepts(item))
            }
            (FieldType::Record(spec), Value::Record(record)) => record_matches(spec, record),
            _ => false,
        }
    }
}

/// Every record field is declared with an accepted value, and only optional
/// fields may be absent.
fn record_matches(spec: &RecordSpec, record: &Record) -> bool {
    if record.name() != spec.name() {
        return false;
    }
    let declared = record.fields().all(|(name, value)| {
        spec.field(name)
            .is_some_and(|field| field.field_type().accepts(value))
    });
    declared
        && spec.fields().iter().all(|field| {
            record.get(field.name()).is_some()
                || matches!(field.field_type(), FieldType::Optional(_))
        })
}

/// Closed set of labels for an enum-typed field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumSpec {
    pub name: String,
    pub labels: Vec<String>,
}

impl EnumSpec {
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|candidate| candidate == label)
    }

    /// Allowed labels rendered as `'a', 'b' or 'c'`.
    pub fn describe_allowed(&self) -> String {
        describe_labels(&self.labels)
    }
}

pub(crate) fn describe_labels(labels: &[String]) -> String {
    let quoted: Vec<String> = labels.iter().map(|label| format!("'{label}'")).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} or {last}", rest.join(", ")),
    }
}

/// Whether a field must be supplied or falls back to a default.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "presence", content = "default", rename_all = "snake_case")]
pub enum Presence {
    Required,
    Default(DefaultValue),
}

/// Default inserted when an input omits the field.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    Fixed(Value),
    /// The validation clock at record-construction time.
    Now,
}

impl DefaultValue {
    pub fn produce(&self, now: DateTime<Utc>) -> Value {
        match self {
            DefaultValue::Fixed(value) => value.clone(),
            DefaultValue::Now => Value::DateTime(now),
        }
    }
}
