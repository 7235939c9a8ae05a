use std::collections::HashMap;
use std::fmt;

use modelcheck_core::{Record, Value};

use crate::context::ValidationContext;

/// Rejection raised by a custom validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub message: String,
    /// Field the rejection is attributed to; record-level validators may
    /// point at one of the record's fields.
    pub field: Option<String>,
}

impl Rejection {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: None,
        }
    }

    pub fn at(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

/// Validator bound to one field of one record spec.
///
/// Runs after coercion and constraint checks passed. The returned value
/// replaces the field's value.
pub trait FieldValidator: Send + Sync {
    fn id(&self) -> &'static str;

    fn apply(&self, value: Value, ctx: &ValidationContext) -> Result<Value, Rejection>;
}

/// Cross-field validator bound to a whole record spec.
///
/// Runs only when every field of the record passed.
pub trait RecordValidator: Send + Sync {
    fn id(&self) -> &'static str;

    fn check(&self, record: &Record, ctx: &ValidationContext) -> Result<(), Rejection>;
}

/// Explicit registration of validators against record specs by name.
///
/// Registration order is invocation order.
#[derive(Default)]
pub struct ValidatorRegistry {
    field_validators: HashMap<String, Vec<Box<dyn FieldValidator>>>,
    record_validators: HashMap<String, Vec<Box<dyn RecordValidator>>>,
    field_targets: Vec<(String, String)>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_field(&mut self, record: &str, field: &str, validator: Box<dyn FieldValidator>) {
        let key = key(record, field);
        if !self.field_validators.contains_key(&key) {
            self.field_targets
                .push((record.to_string(), field.to_string()));
        }
        self.field_validators.entry(key).or_default().push(validator);
    }

    pub fn register_record(&mut self, record: &str, validator: Box<dyn RecordValidator>) {
        self.record_validators
            .entry(record.to_string())
            .or_default()
            .push(validator);
    }

    pub fn field_validators(&self, record: &str, field: &str) -> &[Box<dyn FieldValidator>] {
        self.field_validators
            .get(&key(record, field))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn record_validators(&self, record: &str) -> &[Box<dyn RecordValidator>] {
        self.record_validators
            .get(record)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(record, field)` pairs with at least one field validator, in
    /// registration order.
    pub fn field_targets(&self) -> impl Iterator<Item = (&str, &str)> {
        self.field_targets
            .iter()
            .map(|(record, field)| (record.as_str(), field.as_str()))
    }

    pub fn record_targets(&self) -> impl Iterator<Item = &str> {
        self.record_validators.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.field_validators.is_empty() && self.record_validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut fields: Vec<String> = self
            .field_targets
            .iter()
            .flat_map(|(record, field)| {
                self.field_validators(record, field)
                    .iter()
                    .map(move |validator| format!("{record}.{field}:{}", validator.id()))
            })
            .collect();
        let mut records: Vec<String> = self
            .record_validators
            .iter()
            .flat_map(|(record, validators)| {
                validators
                    .iter()
                    .map(move |validator| format!("{record}:{}", validator.id()))
            })
            .collect();
        fields.sort();
        records.sort();
        f.debug_struct("ValidatorRegistry")
            .field("field_validators", &fields)
            .field("record_validators", &records)
            .finish()
    }
}

fn key(record: &str, field: &str) -> String {
    format!("{record}.{field}")
}
