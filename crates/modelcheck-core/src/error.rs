use thiserror::Error;

/// Core error type shared across modelcheck crates.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The record spec violates definition-time invariants.
    #[error("invalid spec: {0}")]
    InvalidSpec(String),
    /// A record field is absent or holds a value of another shape.
    #[error("field access error on {record}.{field}: {reason}")]
    FieldAccess {
        record: String,
        field: String,
        reason: String,
    },
    /// No model is registered under the requested name.
    #[error("unknown model: {0}")]
    UnknownModel(String),
    /// A derived amount does not fit in a decimal.
    #[error("arithmetic overflow computing {0}")]
    Overflow(String),
}

/// Convenience alias for results returned by modelcheck crates.
pub type Result<T> = std::result::Result<T, Error>;
