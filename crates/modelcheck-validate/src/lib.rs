//! Schema validation engine for modelcheck.
//!
//! Validates untyped JSON mappings against a [`RecordSpec`] and either
//! returns a [`ValidatedRecord`] or a [`ValidationReport`] listing every
//! violation found.
//!
//! [`RecordSpec`]: modelcheck_core::RecordSpec
//! [`ValidationReport`]: modelcheck_core::ValidationReport

pub mod checks;
pub mod coerce;
pub mod context;
pub mod engine;
pub mod record;
pub mod registry;

pub use context::ValidationContext;
pub use engine::Validator;
pub use record::ValidatedRecord;
pub use registry::{FieldValidator, RecordValidator, Rejection, ValidatorRegistry};
