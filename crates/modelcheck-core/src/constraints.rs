use std::fmt;

use regex::Regex;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::types::{FieldType, describe_labels};
use crate::value::Value;

/// Declarative rule attached to a field, evaluated after type coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", content = "value", rename_all = "snake_case")]
pub enum Constraint {
    /// Minimum characters for text, minimum items for lists.
    MinLength(usize),
    /// Maximum characters for text, maximum items for lists.
    MaxLength(usize),
    Gt(Decimal),
    Ge(Decimal),
    Lt(Decimal),
    Le(Decimal),
    Pattern(Pattern),
    /// Text must equal one of the listed values.
    OneOf(Vec<String>),
}

impl Constraint {
    /// Stable rule identifier reported in violations.
    pub fn rule(&self) -> &'static str {
        match self {
            Constraint::MinLength(_) => "min_length",
            Constraint::MaxLength(_) => "max_length",
            Constraint::Gt(_) => "gt",
            Constraint::Ge(_) => "ge",
            Constraint::Lt(_) => "lt",
            Constraint::Le(_) => "le",
            Constraint::Pattern(_) => "pattern",
            Constraint::OneOf(_) => "one_of",
        }
    }

    /// Whether the constraint can be evaluated on values of `field_type`.
    pub fn applies_to(&self, field_type: &FieldType) -> bool {
        let base = field_type.base();
        match self {
            Constraint::MinLength(_) | Constraint::MaxLength(_) => {
                matches!(base, FieldType::Text | FieldType::List(_))
            }
            Constraint::Gt(_) | Constraint::Ge(_) | Constraint::Lt(_) | Constraint::Le(_) => {
                matches!(base, FieldType::Int | FieldType::Decimal)
            }
            Constraint::Pattern(_) | Constraint::OneOf(_) => matches!(base, FieldType::Text),
        }
    }

    /// Evaluate against a coerced non-null value.
    ///
    /// Returns the violation message when the value fails the rule. Values the
    /// rule does not apply to pass.
    pub fn evaluate(&self, value: &Value) -> Option<String> {
        match self {
            Constraint::MinLength(min) => match value {
                Value::Text(text) if text.chars().count() < *min => Some(format!(
                    "string should have at least {}",
                    plural(*min, "character")
                )),
                Value::List(items) if items.len() < *min => Some(format!(
                    "list should have at least {}",
                    plural(*min, "item")
                )),
                _ => None,
            },
            Constraint::MaxLength(max) => match value {
                Value::Text(text) if text.chars().count() > *max => Some(format!(
                    "string should have at most {}",
                    plural(*max, "character")
                )),
                Value::List(items) if items.len() > *max => Some(format!(
                    "list should have at most {}",
                    plural(*max, "item")
                )),
                _ => None,
            },
            Constraint::Gt(bound) => value
                .as_decimal()
                .filter(|number| number <= bound)
                .map(|_| format!("input should be greater than {bound}")),
            Constraint::Ge(bound) => value
                .as_decimal()
                .filter(|number| number < bound)
                .map(|_| format!("input should be greater than or equal to {bound}")),
            Constraint::Lt(bound) => value
                .as_decimal()
                .filter(|number| number >= bound)
                .map(|_| format!("input should be less than {bound}")),
            Constraint::Le(bound) => value
                .as_decimal()
                .filter(|number| number > bound)
                .map(|_| format!("input should be less than or equal to {bound}")),
            Constraint::Pattern(pattern) => value
                .as_text()
                .filter(|text| !pattern.is_match(text))
                .map(|_| format!("string should match pattern '{}'", pattern.as_str())),
            Constraint::OneOf(allowed) => value
                .as_text()
                .filter(|text| !allowed.iter().any(|candidate| candidate == text))
                .map(|_| format!("input should be {}", describe_labels(allowed))),
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Compiled regular expression that keeps its source for reporting.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn new(source: &str) -> Result<Self> {
        let regex = Regex::new(source)
            .map_err(|err| Error::InvalidSpec(format!("invalid pattern '{source}': {err}")))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_bounds_count_characters() {
        let max = Constraint::MaxLength(2);
        assert!(max.evaluate(&Value::Text("中国".to_string())).is_none());
        assert_eq!(
            max.evaluate(&Value::Text("abc".to_string())).as_deref(),
            Some("string should have at most 2 characters")
        );
        assert_eq!(
            Constraint::MinLength(1).evaluate(&Value::List(Vec::new())).as_deref(),
            Some("list should have at least 1 item")
        );
    }

    #[test]
    fn numeric_bounds_compare_ints_as_decimals() {
        let gt = Constraint::Gt(Decimal::ZERO);
        assert!(gt.evaluate(&Value::Int(1)).is_none());
        assert!(gt.evaluate(&Value::Int(0)).is_some());
        assert!(Constraint::Le(Decimal::from(100)).evaluate(&Value::Int(100)).is_none());
        assert!(Constraint::Lt(Decimal::from(100)).evaluate(&Value::Int(100)).is_some());
    }

    #[test]
    fn one_of_lists_allowed_texts() {
        let constraint = Constraint::OneOf(vec!["asc".to_string(), "desc".to_string()]);
        assert_eq!(constraint.rule(), "one_of");
        assert!(constraint.evaluate(&Value::Text("desc".to_string())).is_none());
        assert_eq!(
            constraint.evaluate(&Value::Text("random".to_string())).as_deref(),
            Some("input should be 'asc' or 'desc'")
        );
        assert!(constraint.evaluate(&Value::Int(1)).is_none());
    }

    #[test]
    fn pattern_reports_source() {
        let pattern = Pattern::new(r"^\d{6}$").expect("valid pattern");
        let constraint = Constraint::Pattern(pattern);
        assert!(constraint.evaluate(&Value::Text("100000".to_string())).is_none());
        assert_eq!(
            constraint.evaluate(&Value::Text("1000".to_string())).as_deref(),
            Some(r"string should match pattern '^\d{6}$'")
        );
    }

    #[test]
    fn invalid_pattern_is_a_spec_error() {
        assert!(matches!(Pattern::new("(unclosed"), Err(Error::InvalidSpec(_))));
    }

    #[test]
    fn applicability_follows_base_type() {
        let optional_text = FieldType::optional(FieldType::Text);
        assert!(Constraint::MaxLength(10).applies_to(&optional_text));
        assert!(!Constraint::Gt(Decimal::ZERO).applies_to(&optional_text));
        assert!(!Constraint::MinLength(1).applies_to(&FieldType::Int));
    }
}
