use modelcheck_core::{
    FieldPath, FieldSpec, FieldType, ValidationReport, Value, Violation, ViolationKind,
};

/// Record one violation per failing rule of `field`, in declaration order.
///
/// Enum membership is checked ahead of the declared constraints. Null values
/// carry no constraints.
pub fn check_field(field: &FieldSpec, value: &Value, path: &FieldPath, report: &mut ValidationReport) {
    if value.is_null() {
        return;
    }

    check_membership(field.field_type(), value, path, report);

    for constraint in field.constraints() {
        if let Some(message) = constraint.evaluate(value) {
            report.push(Violation::new(
                ViolationKind::ConstraintViolation,
                path,
                constraint.rule(),
                message,
            ));
        }
    }
}

fn check_membership(
    field_type: &FieldType,
    value: &Value,
    path: &FieldPath,
    report: &mut ValidationReport,
) {
    match (field_type, value) {
        (FieldType::Optional(inner), _) => check_membership(inner, value, path, report),
        (FieldType::Enum(spec), Value::Enum(label)) if !spec.contains(label) => {
            report.push(Violation::new(
                ViolationKind::ConstraintViolation,
                path,
                "enum",
                format!("input should be {}", spec.describe_allowed()),
            ));
        }
        (FieldType::List(inner), Value::List(items)) => {
            for (idx, item) in items.iter().enumerate() {
                check_membership(inner, item, &path.index(idx), report);
            }
        }
        _ => {}
    }
}
