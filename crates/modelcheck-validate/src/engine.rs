use modelcheck_core::{
    FieldPath, FieldSpec, FieldType, Presence, Record, RecordSpec, ValidationReport, Value,
    Violation, ViolationKind,
};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::checks::check_field;
use crate::coerce::{coerce_scalar, expected};
use crate::context::ValidationContext;
use crate::record::ValidatedRecord;
use crate::registry::ValidatorRegistry;

/// Entry point for validating untyped inputs against record specs.
///
/// Holds no mutable state; one validator may be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'a> {
    registry: &'a ValidatorRegistry,
    context: ValidationContext,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a ValidatorRegistry, context: ValidationContext) -> Self {
        Self { registry, context }
    }

    pub fn context(&self) -> &ValidationContext {
        &self.context
    }

    /// Validate `input` against `spec`, collecting every violation.
    pub fn validate(
        &self,
        spec: &RecordSpec,
        input: &JsonValue,
    ) -> Result<ValidatedRecord, ValidationReport> {
        let mut report = ValidationReport::default();
        let root = FieldPath::root();

        let record = match input.as_object() {
            Some(map) => self.validate_object(spec, map, &root, &mut report),
            None => {
                report.push(Violation::type_mismatch(&root, "object"));
                None
            }
        };

        match record {
            Some(record) if report.is_ok() => {
                debug!(event = "record_validated", record = spec.name());
                Ok(ValidatedRecord::new(record))
            }
            _ => {
                debug!(
                    event = "record_rejected",
                    record = spec.name(),
                    violations = report.len()
                );
                Err(report)
            }
        }
    }

    fn validate_object(
        &self,
        spec: &RecordSpec,
        input: &Map<String, JsonValue>,
        path: &FieldPath,
        report: &mut ValidationReport,
    ) -> Option<Record> {
        let start = report.len();
        let mut fields = Vec::with_capacity(spec.fields().len());

        for field in spec.fields() {
            let field_path = path.key(field.name());
            match input.get(field.name()) {
                None => match field.presence() {
                    Presence::Required => report.push(Violation::missing(&field_path)),
                    Presence::Default(default) => fields.push((
                        field.name().to_string(),
                        default.produce(self.context.now),
                    )),
                },
                Some(raw) => {
                    if let Some(value) = self.validate_field(spec, field, raw, &field_path, report)
                    {
                        fields.push((field.name().to_string(), value));
                    }
                }
            }
        }

        if report.len() > start {
            return None;
        }

        let record = Record::new(spec.name(), fields);
        for validator in self.registry.record_validators(spec.name()) {
            if let Err(rejection) = validator.check(&record, &self.context) {
                let at = match &rejection.field {
                    Some(field) => path.key(field),
                    None => path.clone(),
                };
                report.push(Violation::new(
                    ViolationKind::CustomValidationFailure,
                    &at,
                    validator.id(),
                    rejection.message,
                ));
            }
        }

        (report.len() == start).then_some(record)
    }

    fn validate_field(
        &self,
        spec: &RecordSpec,
        field: &FieldSpec,
        raw: &JsonValue,
        path: &FieldPath,
        report: &mut ValidationReport,
    ) -> Option<Value> {
        let mut value = self.coerce(field.field_type(), raw, path, report)?;

        let before = report.len();
        check_field(field, &value, path, report);
        if report.len() > before {
            return None;
        }

        for validator in self.registry.field_validators(spec.name(), field.name()) {
            match validator.apply(value, &self.context) {
                Ok(next) => value = next,
                Err(rejection) => {
                    report.push(Violation::new(
                        ViolationKind::CustomValidationFailure,
                        path,
                        validator.id(),
                        rejection.message,
                    ));
                    return None;
                }
            }
            if !field.field_type().accepts(&value) {
                report.push(Violation::new(
                    ViolationKind::CustomValidationFailure,
                    path,
                    validator.id(),
                    format!(
                        "validator produced {} for {} field",
                        value.kind(),
                        field.field_type().name()
                    ),
                ));
                return None;
            }
        }

        Some(value)
    }

    fn coerce(
        &self,
        field_type: &FieldType,
        raw: &JsonValue,
        path: &FieldPath,
        report: &mut ValidationReport,
    ) -> Option<Value> {
        match field_type {
            FieldType::Optional(inner) => {
                if raw.is_null() {
                    Some(Value::Null)
                } else {
                    self.coerce(inner, raw, path, report)
                }
            }
            FieldType::List(inner) => {
                let Some(items) = raw.as_array() else {
                    report.push(Violation::type_mismatch(path, expected(field_type)));
                    return None;
                };
                let start = report.len();
                let mut values = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    if let Some(value) = self.coerce(inner, item, &path.index(idx), report) {
                        values.push(value);
                    }
                }
                (report.len() == start).then_some(Value::List(values))
            }
            FieldType::Record(spec) => {
                let Some(map) = raw.as_object() else {
                    report.push(Violation::type_mismatch(path, expected(field_type)));
                    return None;
                };
                self.validate_object(spec, map, path, report)
                    .map(Value::Record)
            }
            scalar => match coerce_scalar(scalar, raw) {
                Some(value) => Some(value),
                None => {
                    report.push(Violation::type_mismatch(path, expected(scalar)));
                    None
                }
            },
        }
    }
}
