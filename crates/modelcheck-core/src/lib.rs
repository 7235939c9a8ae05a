//! Core contracts for modelcheck.
//!
//! This crate defines record specs, runtime values and records, and the
//! violation report shared by the validation engine, the model catalog and
//! the CLI.

pub mod constraints;
pub mod error;
pub mod report;
pub mod spec;
pub mod types;
pub mod value;

pub use constraints::{Constraint, Pattern};
pub use error::{Error, Result};
pub use report::{FieldPath, ValidationReport, Violation, ViolationKind, report_json_schema};
pub use spec::{FieldSpec, RecordSpec, RecordSpecBuilder};
pub use types::{DefaultValue, EnumSpec, FieldType, Presence};
pub use value::{Record, Value};
