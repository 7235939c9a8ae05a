use modelcheck_core::{FieldSpec, FieldType, Record, RecordSpec, Result, Value};
use serde::Serialize;

use crate::model::Model;

/// Basic user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub age: Option<i64>,
    pub is_active: bool,
}

impl Model for User {
    const NAME: &'static str = "user";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Basic user account")
            .field(FieldSpec::new("username", FieldType::Text))
            .field(FieldSpec::new("email", FieldType::Text))
            .field(FieldSpec::optional("age", FieldType::Int))
            .field(FieldSpec::new("is_active", FieldType::Bool).default(Value::Bool(true)))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            username: record.text("username")?.to_string(),
            email: record.text("email")?.to_string(),
            age: record.opt_int("age")?,
            is_active: record.bool("is_active")?,
        })
    }
}

/// Sign-up payload where the email may be left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDraft {
    pub username: String,
    pub email: Option<String>,
}

impl Model for UserDraft {
    const NAME: &'static str = "user_draft";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("User sign-up with an optional email")
            .field(FieldSpec::new("username", FieldType::Text))
            .field(FieldSpec::optional("email", FieldType::Text))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            username: record.text("username")?.to_string(),
            email: record.opt_text("email")?.map(str::to_string),
        })
    }
}
