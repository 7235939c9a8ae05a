use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::constraints::{Constraint, Pattern};
use crate::error::{Error, Result};
use crate::types::{DefaultValue, FieldType, Presence};
use crate::value::Value;

/// Definition of one field within a record spec.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    name: String,
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(flatten)]
    presence: Presence,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    constraints: Vec<Constraint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl FieldSpec {
    /// Required field without constraints.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            presence: Presence::Required,
            constraints: Vec::new(),
            description: None,
        }
    }

    /// Optional field defaulting to `null`.
    pub fn optional(name: impl Into<String>, inner: FieldType) -> Self {
        Self::new(name, FieldType::optional(inner)).default(Value::Null)
    }

    pub fn default(mut self, value: Value) -> Self {
        self.presence = Presence::Default(DefaultValue::Fixed(value));
        self
    }

    /// Default to the validation clock.
    pub fn default_now(mut self) -> Self {
        self.presence = Presence::Default(DefaultValue::Now);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn min_length(self, min: usize) -> Self {
        self.constraint(Constraint::MinLength(min))
    }

    pub fn max_length(self, max: usize) -> Self {
        self.constraint(Constraint::MaxLength(max))
    }

    pub fn gt(self, bound: impl Into<Decimal>) -> Self {
        self.constraint(Constraint::Gt(bound.into()))
    }

    pub fn ge(self, bound: impl Into<Decimal>) -> Self {
        self.constraint(Constraint::Ge(bound.into()))
    }

    pub fn lt(self, bound: impl Into<Decimal>) -> Self {
        self.constraint(Constraint::Lt(bound.into()))
    }

    pub fn le(self, bound: impl Into<Decimal>) -> Self {
        self.constraint(Constraint::Le(bound.into()))
    }

    pub fn pattern(self, source: &str) -> Result<Self> {
        Ok(self.constraint(Constraint::Pattern(Pattern::new(source)?)))
    }

    pub fn one_of<I, S>(self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraint(Constraint::OneOf(
            allowed.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_required(&self) -> bool {
        matches!(self.presence, Presence::Required)
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Schema definition for one record shape.
///
/// Instances are only produced by [`RecordSpecBuilder::build`], so every spec
/// in circulation has passed the definition-time checks.
#[derive(Debug, Clone, Serialize)]
pub struct RecordSpec {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    fields: Vec<FieldSpec>,
}

impl RecordSpec {
    pub fn builder(name: impl Into<String>) -> RecordSpecBuilder {
        RecordSpecBuilder {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// Builder collecting field specs in declaration order.
#[derive(Debug, Clone)]
pub struct RecordSpecBuilder {
    name: String,
    description: Option<String>,
    fields: Vec<FieldSpec>,
}

impl RecordSpecBuilder {
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Check definition-time invariants and freeze the spec.
    pub fn build(self) -> Result<RecordSpec> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidSpec("record name is empty".to_string()));
        }

        let mut seen = BTreeSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(Error::InvalidSpec(format!(
                    "duplicate field name: {}.{}",
                    self.name, field.name
                )));
            }
            check_field(&self.name, field)?;
        }

        Ok(RecordSpec {
            name: self.name,
            description: self.description,
            fields: self.fields,
        })
    }
}

fn check_field(record: &str, field: &FieldSpec) -> Result<()> {
    let location = format!("{record}.{}", field.name);

    if field.name.is_empty() {
        return Err(Error::InvalidSpec(format!("empty field name in {record}")));
    }

    check_type(&location, &field.field_type)?;

    for constraint in &field.constraints {
        if !constraint.applies_to(&field.field_type) {
            return Err(Error::InvalidSpec(format!(
                "constraint {} does not apply to {} field {location}",
                constraint.rule(),
                field.field_type.name()
            )));
        }
    }

    check_lengths(&location, &field.constraints)?;
    check_bounds(&location, &field.constraints)?;

    match &field.presence {
        Presence::Required => {}
        Presence::Default(DefaultValue::Now) => {
            if !matches!(field.field_type.base(), FieldType::DateTime) {
                return Err(Error::InvalidSpec(format!(
                    "clock default requires a datetime field: {location}"
                )));
            }
        }
        Presence::Default(DefaultValue::Fixed(value)) => {
            if !field.field_type.accepts(value) {
                return Err(Error::InvalidSpec(format!(
                    "default {} does not match {} field {location}",
                    value.kind(),
                    field.field_type.name()
                )));
            }
        }
    }

    Ok(())
}

fn check_type(location: &str, field_type: &FieldType) -> Result<()> {
    match field_type {
        FieldType::Enum(spec) => {
            if spec.labels.is_empty() {
                return Err(Error::InvalidSpec(format!(
                    "enum {} has no labels ({location})",
                    spec.name
                )));
            }
            let mut seen = BTreeSet::new();
            for label in &spec.labels {
                if !seen.insert(label.as_str()) {
                    return Err(Error::InvalidSpec(format!(
                        "duplicate enum label '{label}' in {} ({location})",
                        spec.name
                    )));
                }
            }
            Ok(())
        }
        FieldType::List(inner) => check_type(location, inner),
        FieldType::Optional(inner) => {
            if inner.is_optional() {
                return Err(Error::InvalidSpec(format!(
                    "nested optional type at {location}"
                )));
            }
            check_type(location, inner)
        }
        _ => Ok(()),
    }
}

fn check_lengths(location: &str, constraints: &[Constraint]) -> Result<()> {
    let min = constraints
        .iter()
        .filter_map(|constraint| match constraint {
            Constraint::MinLength(min) => Some(*min),
            _ => None,
        })
        .max();
    let max = constraints
        .iter()
        .filter_map(|constraint| match constraint {
            Constraint::MaxLength(max) => Some(*max),
            _ => None,
        })
        .min();

    match (min, max) {
        (Some(min), Some(max)) if min > max => Err(Error::InvalidSpec(format!(
            "min_length {min} exceeds max_length {max} at {location}"
        ))),
        _ => Ok(()),
    }
}

fn check_bounds(location: &str, constraints: &[Constraint]) -> Result<()> {
    for lower in constraints {
        let (low, low_strict) = match lower {
            Constraint::Gt(bound) => (bound, true),
            Constraint::Ge(bound) => (bound, false),
            _ => continue,
        };
        for upper in constraints {
            let (high, high_strict) = match upper {
                Constraint::Lt(bound) => (bound, true),
                Constraint::Le(bound) => (bound, false),
                _ => continue,
            };
            let empty = low > high || (low == high && (low_strict || high_strict));
            if empty {
                return Err(Error::InvalidSpec(format!(
                    "numeric bounds {} {low} and {} {high} admit no value at {location}",
                    lower.rule(),
                    upper.rule()
                )));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EnumSpec;

    fn invalid(result: Result<RecordSpec>) -> String {
        match result {
            Err(Error::InvalidSpec(message)) => message,
            other => panic!("expected invalid spec, got {other:?}"),
        }
    }

    #[test]
    fn builds_fields_in_declaration_order() {
        let spec = RecordSpec::builder("pagination")
            .field(FieldSpec::new("skip", FieldType::Int).default(Value::Int(0)))
            .field(FieldSpec::new("limit", FieldType::Int).default(Value::Int(10)))
            .build()
            .expect("valid spec");

        let names: Vec<&str> = spec.fields().iter().map(FieldSpec::name).collect();
        assert_eq!(names, vec!["skip", "limit"]);
        assert!(!spec.field("skip").is_some_and(FieldSpec::is_required));
    }

    #[test]
    fn rejects_duplicate_fields() {
        let message = invalid(
            RecordSpec::builder("user")
                .field(FieldSpec::new("email", FieldType::Text))
                .field(FieldSpec::new("email", FieldType::Text))
                .build(),
        );
        assert!(message.contains("user.email"));
    }

    #[test]
    fn rejects_constraint_on_wrong_type() {
        let message = invalid(
            RecordSpec::builder("book")
                .field(FieldSpec::new("pages", FieldType::Int).max_length(3))
                .build(),
        );
        assert!(message.contains("max_length"));
    }

    #[test]
    fn rejects_inverted_bounds() {
        invalid(
            RecordSpec::builder("order")
                .field(FieldSpec::new("discount_rate", FieldType::Decimal).ge(50).le(0))
                .build(),
        );
        invalid(
            RecordSpec::builder("order_item")
                .field(FieldSpec::new("quantity", FieldType::Int).gt(5).lt(5))
                .build(),
        );
        invalid(
            RecordSpec::builder("product")
                .field(FieldSpec::new("name", FieldType::Text).min_length(10).max_length(2))
                .build(),
        );
    }

    #[test]
    fn accepts_closed_inclusive_range() {
        RecordSpec::builder("order")
            .field(FieldSpec::new("discount_rate", FieldType::Decimal).ge(0).le(0))
            .build()
            .expect("single-point range is valid");
    }

    #[test]
    fn rejects_mismatched_default() {
        invalid(
            RecordSpec::builder("product")
                .field(FieldSpec::new("in_stock", FieldType::Bool).default(Value::Int(1)))
                .build(),
        );
        invalid(
            RecordSpec::builder("user")
                .field(FieldSpec::new("age", FieldType::Int).default(Value::Null))
                .build(),
        );
        invalid(
            RecordSpec::builder("customer")
                .field(FieldSpec::new("join_date", FieldType::Text).default_now())
                .build(),
        );
    }

    #[test]
    fn enum_default_must_be_a_member() {
        let status = EnumSpec::new("customer_status", ["active", "inactive"]);
        invalid(
            RecordSpec::builder("customer")
                .field(
                    FieldSpec::new("status", FieldType::Enum(status.clone()))
                        .default(Value::Enum("deleted".to_string())),
                )
                .build(),
        );
        RecordSpec::builder("customer")
            .field(
                FieldSpec::new("status", FieldType::Enum(status))
                    .default(Value::Enum("active".to_string())),
            )
            .build()
            .expect("member default is valid");
    }

    #[test]
    fn defaults_skip_constraint_checks() {
        RecordSpec::builder("address")
            .field(
                FieldSpec::new("country", FieldType::Text)
                    .max_length(1)
                    .default(Value::Text("中国".to_string())),
            )
            .build()
            .expect("defaults are trusted");
    }

    #[test]
    fn rejects_empty_enum() {
        invalid(
            RecordSpec::builder("model_path")
                .field(FieldSpec::new(
                    "model_name",
                    FieldType::Enum(EnumSpec::new("model_name", Vec::<String>::new())),
                ))
                .build(),
        );
    }
}
