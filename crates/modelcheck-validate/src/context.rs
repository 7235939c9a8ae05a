use chrono::{DateTime, Utc};

/// Per-call inputs that are not part of the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    /// Clock used for `now` defaults and date-relative validators.
    pub now: DateTime<Utc>,
}

impl ValidationContext {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self { now: Utc::now() }
    }
}
