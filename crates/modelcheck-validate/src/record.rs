use std::ops::Deref;

use modelcheck_core::Record;
use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

/// Record that passed every check of its spec.
///
/// Only the engine constructs these; there is no way to change a field
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    record: Record,
}

impl ValidatedRecord {
    pub(crate) fn new(record: Record) -> Self {
        Self { record }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn to_json(&self) -> JsonValue {
        self.record.to_json()
    }
}

impl Deref for ValidatedRecord {
    type Target = Record;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}

impl AsRef<Record> for ValidatedRecord {
    fn as_ref(&self) -> &Record {
        &self.record
    }
}

impl Serialize for ValidatedRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record.serialize(serializer)
    }
}
