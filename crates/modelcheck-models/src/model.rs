use modelcheck_core::{Error, Record, RecordSpec, Result, ValidationReport};
use modelcheck_validate::ValidatorRegistry;
use thiserror::Error;

/// Typed struct backed by a record spec.
pub trait Model: Sized {
    /// Record spec name, also the catalog key.
    const NAME: &'static str;

    fn spec() -> Result<RecordSpec>;

    /// Register the model's custom validators.
    fn register(_registry: &mut ValidatorRegistry) {}

    /// Build the typed struct from a record produced for [`Model::spec`].
    fn from_record(record: &Record) -> Result<Self>;
}

/// Errors returned when parsing inputs into typed models.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("validation failed: {0}")]
    Invalid(#[from] ValidationReport),
    #[error(transparent)]
    Spec(#[from] Error),
}

impl ModelError {
    /// Violation report when the input was rejected.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            ModelError::Invalid(report) => Some(report),
            ModelError::Spec(_) => None,
        }
    }
}
