//! Lax conversion of JSON values into declared primitive types.
//!
//! Inputs often arrive as strings (path segments, query parameters), so
//! numeric and boolean fields accept their textual forms.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use modelcheck_core::{FieldType, Value};
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

/// Coerce a scalar JSON value into `field_type`.
///
/// Lists, records and optionals are handled by the engine; passing them here
/// yields `None`.
pub fn coerce_scalar(field_type: &FieldType, raw: &JsonValue) -> Option<Value> {
    match field_type {
        FieldType::Bool => to_bool(raw).map(Value::Bool),
        FieldType::Int => to_int(raw).map(Value::Int),
        FieldType::Decimal => to_decimal(raw).map(Value::Decimal),
        FieldType::Text => raw.as_str().map(|text| Value::Text(text.to_string())),
        FieldType::DateTime => to_datetime(raw).map(Value::DateTime),
        FieldType::Enum(_) => raw.as_str().map(|label| Value::Enum(label.to_string())),
        FieldType::List(_) | FieldType::Record(_) | FieldType::Optional(_) => None,
    }
}

/// Noun used in type-mismatch messages.
pub fn expected(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Bool => "boolean",
        FieldType::Int => "integer",
        FieldType::Decimal => "number",
        FieldType::Text | FieldType::Enum(_) => "string",
        FieldType::DateTime => "datetime",
        FieldType::List(_) => "list",
        FieldType::Record(_) => "object",
        FieldType::Optional(inner) => expected(inner),
    }
}

pub fn to_int(raw: &JsonValue) -> Option<i64> {
    match raw {
        JsonValue::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|value| value.is_finite() && value.fract() == 0.0)
                .filter(|value| *value >= i64::MIN as f64 && *value < i64::MAX as f64)
                .map(|value| value as i64)
        }),
        JsonValue::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn to_decimal(raw: &JsonValue) -> Option<Decimal> {
    match raw {
        JsonValue::Number(number) => parse_decimal(&number.to_string()),
        JsonValue::String(text) => parse_decimal(text.trim()),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

pub fn to_bool(raw: &JsonValue) -> Option<bool> {
    match raw {
        JsonValue::Bool(value) => Some(*value),
        JsonValue::Number(number) => match number.as_i64() {
            Some(0) => Some(false),
            Some(1) => Some(true),
            _ => None,
        },
        JsonValue::String(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Some(true),
            "false" | "0" | "no" | "off" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

pub fn to_datetime(raw: &JsonValue) -> Option<DateTime<Utc>> {
    match raw {
        JsonValue::String(text) => DateTime::parse_from_rfc3339(text.trim())
            .ok()
            .map(|value| value.with_timezone(&Utc)),
        JsonValue::Number(number) => number
            .as_i64()
            .and_then(|seconds| DateTime::from_timestamp(seconds, 0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(json!(42), Some(42))]
    #[case(json!(-7), Some(-7))]
    #[case(json!(3.0), Some(3))]
    #[case(json!(3.5), None)]
    #[case(json!(" 12 "), Some(12))]
    #[case(json!("12.5"), None)]
    #[case(json!("abc"), None)]
    #[case(json!(true), None)]
    #[case(json!(null), None)]
    fn coerces_ints(#[case] raw: JsonValue, #[case] expected: Option<i64>) {
        assert_eq!(to_int(&raw), expected);
    }

    #[rstest]
    #[case(json!(19.99), Some("19.99"))]
    #[case(json!(3), Some("3"))]
    #[case(json!("0.10"), Some("0.10"))]
    #[case(json!("1e-3"), Some("0.001"))]
    #[case(json!("12345678901234567890.123456789"), Some("12345678901234567890.123456789"))]
    #[case(json!("79228162514264337593543950335"), Some("79228162514264337593543950335"))]
    #[case(json!("79228162514264337593543950336"), None)]
    #[case(json!("1e40"), None)]
    #[case(json!(1e40), None)]
    #[case(json!("free"), None)]
    #[case(json!(false), None)]
    fn coerces_decimals(#[case] raw: JsonValue, #[case] expected: Option<&str>) {
        let expected = expected.map(|text| Decimal::from_str(text).expect("decimal literal"));
        assert_eq!(to_decimal(&raw), expected);
    }

    #[rstest]
    #[case(json!(true), Some(true))]
    #[case(json!("False"), Some(false))]
    #[case(json!("yes"), Some(true))]
    #[case(json!("off"), Some(false))]
    #[case(json!(1), Some(true))]
    #[case(json!(2), None)]
    #[case(json!("maybe"), None)]
    fn coerces_bools(#[case] raw: JsonValue, #[case] expected: Option<bool>) {
        assert_eq!(to_bool(&raw), expected);
    }

    #[test]
    fn coerces_datetimes() {
        let parsed = to_datetime(&json!("2024-05-01T08:30:00+08:00")).expect("rfc3339");
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T00:30:00+00:00");
        let epoch = to_datetime(&json!(0)).expect("unix seconds");
        assert_eq!(epoch.timestamp(), 0);
        assert!(to_datetime(&json!("yesterday")).is_none());
    }

    #[test]
    fn text_is_not_coerced_from_numbers() {
        assert!(coerce_scalar(&FieldType::Text, &json!(5)).is_none());
        assert_eq!(
            coerce_scalar(&FieldType::Text, &json!("5")),
            Some(Value::Text("5".to_string()))
        );
    }
}
