use std::fmt;

use schemars::JsonSchema;
use schemars::schema::RootSchema;
use schemars::schema_for;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a single rule failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent from the input.
    MissingField,
    /// Value could not be coerced to the declared type.
    TypeMismatch,
    /// Coerced value fails a declared bound, pattern or membership rule.
    ConstraintViolation,
    /// A field-level or record-level validator rejected the value.
    CustomValidationFailure,
}

/// One violation with its location and rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub kind: ViolationKind,
    /// Fully-qualified field path, e.g. `items[1].unit_price`.
    pub path: String,
    /// Rule identifier (`missing`, `type`, `min_length`, a validator id, ...).
    pub rule: String,
    pub message: String,
}

impl Violation {
    pub fn new(
        kind: ViolationKind,
        path: &FieldPath,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            path: path.to_string(),
            rule: rule.into(),
            message: message.into(),
        }
    }

    pub fn missing(path: &FieldPath) -> Self {
        Self::new(ViolationKind::MissingField, path, "missing", "field required")
    }

    pub fn type_mismatch(path: &FieldPath, expected: &str) -> Self {
        Self::new(
            ViolationKind::TypeMismatch,
            path,
            "type",
            format!("input should be a valid {expected}"),
        )
    }
}

/// Complete, ordered set of violations from one validation call.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Error)]
#[error("{} validation violation(s)", .violations.len())]
pub struct ValidationReport {
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Returns true when no violation was recorded.
    pub fn is_ok(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Merge another report into this one.
    pub fn merge(&mut self, other: ValidationReport) {
        self.violations.extend(other.violations);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Violations recorded at exactly `path`.
    pub fn at<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |violation| violation.path == path)
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations
            .iter()
            .filter(|violation| violation.kind == kind)
            .count()
    }
}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

/// Emit the JSON Schema of a serialized [`ValidationReport`].
pub fn report_json_schema() -> RootSchema {
    schema_for!(ValidationReport)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a (possibly nested) input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn key(&self, name: &str) -> Self {
        self.with(Segment::Key(name.to_string()))
    }

    pub fn index(&self, index: usize) -> Self {
        self.with(Segment::Index(index))
    }

    fn with(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(name) if idx == 0 => write!(f, "{name}")?,
                Segment::Key(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
