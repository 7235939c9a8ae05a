use std::str::FromStr;

use chrono::{TimeZone, Utc};
use modelcheck_core::{
    EnumSpec, FieldSpec, FieldType, Record, RecordSpec, Value, ViolationKind,
};
use modelcheck_validate::{
    FieldValidator, RecordValidator, Rejection, ValidationContext, Validator, ValidatorRegistry,
};
use rust_decimal::Decimal;
use serde_json::json;

fn context() -> ValidationContext {
    ValidationContext::at(Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
}

fn line_spec() -> RecordSpec {
    RecordSpec::builder("line")
        .field(FieldSpec::new("sku", FieldType::Int).gt(0))
        .field(FieldSpec::new("quantity", FieldType::Int).gt(0).le(100))
        .field(FieldSpec::new("unit_price", FieldType::Decimal).gt(0))
        .build()
        .expect("valid line spec")
}

fn basket_spec() -> RecordSpec {
    RecordSpec::builder("basket")
        .field(FieldSpec::new("owner", FieldType::Text).min_length(1).max_length(20))
        .field(
            FieldSpec::new("lines", FieldType::list(FieldType::record(line_spec())))
                .min_length(1)
                .max_length(3),
        )
        .field(
            FieldSpec::new("state", FieldType::Enum(EnumSpec::new("state", ["open", "closed"])))
                .default(Value::Enum("open".to_string())),
        )
        .field(FieldSpec::optional("note", FieldType::Text).max_length(5))
        .field(FieldSpec::new("created_at", FieldType::DateTime).default_now())
        .build()
        .expect("valid basket spec")
}

fn valid_basket() -> serde_json::Value {
    json!({
        "owner": "ana",
        "lines": [
            {"sku": 1, "quantity": 3, "unit_price": 19.99},
            {"sku": 2, "quantity": 1, "unit_price": "5.00"}
        ]
    })
}

struct Shout;

impl FieldValidator for Shout {
    fn id(&self) -> &'static str {
        "basket.owner.shout"
    }

    fn apply(&self, value: Value, _ctx: &ValidationContext) -> Result<Value, Rejection> {
        match value {
            Value::Text(text) if text.contains('!') => Err(Rejection::new("owner cannot shout")),
            Value::Text(text) => Ok(Value::Text(text.trim().to_uppercase())),
            other => Ok(other),
        }
    }
}

struct DistinctSkus;

impl RecordValidator for DistinctSkus {
    fn id(&self) -> &'static str {
        "basket.distinct_skus"
    }

    fn check(&self, record: &Record, _ctx: &ValidationContext) -> Result<(), Rejection> {
        let lines = record
            .list("lines")
            .map_err(|err| Rejection::new(err.to_string()))?;
        let mut seen = std::collections::HashSet::new();
        for line in lines {
            let sku = line
                .as_record()
                .and_then(|line| line.get("sku"))
                .and_then(Value::as_int);
            if !seen.insert(sku) {
                return Err(Rejection::at("lines", "duplicate sku"));
            }
        }
        Ok(())
    }
}

fn registry() -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    registry.register_field("basket", "owner", Box::new(Shout));
    registry.register_record("basket", Box::new(DistinctSkus));
    registry
}

#[test]
fn valid_input_produces_record_with_defaults() {
    let registry = registry();
    let validator = Validator::new(&registry, context());

    let record = validator
        .validate(&basket_spec(), &valid_basket())
        .expect("basket should validate");

    assert_eq!(record.name(), "basket");
    assert_eq!(record.text("owner").ok(), Some("ANA"));
    assert_eq!(record.label("state").ok(), Some("open"));
    assert_eq!(record.opt_text("note").ok(), Some(None));
    assert_eq!(record.datetime("created_at").ok(), Some(context().now));
    let lines = record.list("lines").expect("lines present");
    let second = lines[1].as_record().expect("line record");
    assert_eq!(
        second.decimal("unit_price").ok(),
        Some(Decimal::from_str("5.00").unwrap())
    );
}

#[test]
fn missing_required_field_is_reported_once() {
    let registry = registry();
    let validator = Validator::new(&registry, context());
    let mut input = valid_basket();
    input.as_object_mut().unwrap().remove("owner");

    let report = validator.validate(&basket_spec(), &input).unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::MissingField);
    assert_eq!(report.violations[0].path, "owner");
}

#[test]
fn type_mismatch_skips_constraints() {
    let registry = ValidatorRegistry::new();
    let validator = Validator::new(&registry, context());
    let mut input = valid_basket();
    input["owner"] = json!(12345678901234567_i64);

    let report = validator.validate(&basket_spec(), &input).unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].kind, ViolationKind::TypeMismatch);
    assert_eq!(report.violations[0].message, "input should be a valid string");
}

#[test]
fn nested_violations_carry_indexed_paths() {
    let registry = registry();
    let validator = Validator::new(&registry, context());
    let input = json!({
        "owner": "ana",
        "lines": [
            {"sku": 1, "quantity": 3, "unit_price": 19.99},
            {"sku": 2, "quantity": 0, "unit_price": -1},
            {"quantity": "many", "unit_price": 1}
        ]
    });

    let report = validator.validate(&basket_spec(), &input).unwrap_err();

    let located: Vec<(&str, ViolationKind)> = report
        .iter()
        .map(|violation| (violation.path.as_str(), violation.kind))
        .collect();
    assert_eq!(
        located,
        vec![
            ("lines[1].quantity", ViolationKind::ConstraintViolation),
            ("lines[1].unit_price", ViolationKind::ConstraintViolation),
            ("lines[2].sku", ViolationKind::MissingField),
            ("lines[2].quantity", ViolationKind::TypeMismatch),
        ]
    );
}

#[test]
fn violations_follow_declaration_order_across_fields() {
    let registry = registry();
    let validator = Validator::new(&registry, context());
    let input = json!({
        "owner": "",
        "lines": [],
        "state": "archived",
        "note": "far too long"
    });

    let report = validator.validate(&basket_spec(), &input).unwrap_err();

    let rules: Vec<(&str, &str)> = report
        .iter()
        .map(|violation| (violation.path.as_str(), violation.rule.as_str()))
        .collect();
    assert_eq!(
        rules,
        vec![
            ("owner", "min_length"),
            ("lines", "min_length"),
            ("state", "enum"),
            ("note", "max_length"),
        ]
    );
}

#[test]
fn each_violated_bound_is_reported() {
    let spec = RecordSpec::builder("reading")
        .field(
            FieldSpec::new("level", FieldType::Int)
                .gt(0)
                .ge(1)
                .le(10),
        )
        .build()
        .expect("valid spec");
    let registry = ValidatorRegistry::new();
    let validator = Validator::new(&registry, context());

    let report = validator
        .validate(&spec, &json!({"level": "-3"}))
        .unwrap_err();

    assert_eq!(report.count(ViolationKind::ConstraintViolation), 2);
    let rules: Vec<&str> = report.iter().map(|violation| violation.rule.as_str()).collect();
    assert_eq!(rules, vec!["gt", "ge"]);
}

#[test]
fn validator_rejection_is_custom_failure() {
    let registry = registry();
    let validator = Validator::new(&registry, context());
    let mut input = valid_basket();
    input["owner"] = json!("ana!");

    let report = validator.validate(&basket_spec(), &input).unwrap_err();

    assert_eq!(report.len(), 1);
    let violation = &report.violations[0];
    assert_eq!(violation.kind, ViolationKind::CustomValidationFailure);
    assert_eq!(violation.rule, "basket.owner.shout");
    assert_eq!(violation.message, "owner cannot shout");
}

#[test]
fn field_validators_skip_values_that_failed_constraints() {
    let registry = registry();
    let validator = Validator::new(&registry, context());
    let mut input = valid_basket();
    input["owner"] = json!("this owner name is way too long!");

    let report = validator.validate(&basket_spec(), &input).unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].rule, "max_length");
}

#[test]
fn record_validator_runs_only_after_fields_pass() {
    let registry = registry();
    let validator = Validator::new(&registry, context());
    let duplicated = json!({
        "owner": "ana",
        "lines": [
            {"sku": 4, "quantity": 1, "unit_price": 1},
            {"sku": 4, "quantity": 2, "unit_price": 1}
        ]
    });

    let report = validator.validate(&basket_spec(), &duplicated).unwrap_err();
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].path, "lines");
    assert_eq!(report.violations[0].kind, ViolationKind::CustomValidationFailure);

    let mut broken = duplicated.clone();
    broken["owner"] = json!("");
    let report = validator.validate(&basket_spec(), &broken).unwrap_err();
    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].rule, "min_length");
}

#[test]
fn non_object_input_is_a_type_mismatch() {
    let registry = ValidatorRegistry::new();
    let validator = Validator::new(&registry, context());

    let report = validator.validate(&basket_spec(), &json!([1, 2])).unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(report.violations[0].path, "");
    assert_eq!(report.violations[0].kind, ViolationKind::TypeMismatch);
}

#[test]
fn unknown_keys_are_ignored() {
    let registry = registry();
    let validator = Validator::new(&registry, context());
    let mut input = valid_basket();
    input["coupon"] = json!("SPRING");

    let record = validator
        .validate(&basket_spec(), &input)
        .expect("extra keys are ignored");
    assert!(record.get("coupon").is_none());
}

#[test]
fn revalidating_output_is_idempotent() {
    let registry = ValidatorRegistry::new();
    let validator = Validator::new(&registry, context());

    let first = validator
        .validate(&basket_spec(), &valid_basket())
        .expect("first pass");
    let second = validator
        .validate(&basket_spec(), &first.to_json())
        .expect("second pass");

    assert_eq!(first, second);
}

#[test]
fn validation_is_shareable_across_threads() {
    let registry = registry();
    let spec = basket_spec();
    let validator = Validator::new(&registry, context());
    let expected = validator.validate(&spec, &valid_basket()).expect("baseline");

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| validator.validate(&spec, &valid_basket())))
            .collect();
        for handle in handles {
            let record = handle.join().expect("thread finished").expect("valid");
            assert_eq!(record, expected);
        }
    });
}
