use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use modelcheck_core::{EnumSpec, Error, FieldSpec, FieldType, Record, RecordSpec, Result, Value};
use modelcheck_validate::{FieldValidator, Rejection, ValidationContext, ValidatorRegistry};
use serde::Serialize;

use crate::model::Model;

const DISPOSABLE_DOMAINS: [&str; 3] = ["temp-mail.org", "10minutemail.com", "guerrillamail.com"];

/// Postal address nested inside a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Model for Address {
    const NAME: &'static str = "address";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Postal address")
            .field(FieldSpec::new("street", FieldType::Text).min_length(1))
            .field(FieldSpec::new("city", FieldType::Text).min_length(1))
            .field(
                FieldSpec::new("postal_code", FieldType::Text)
                    .pattern(r"^\d{6}$")?
                    .describe("six digit postal code"),
            )
            .field(
                FieldSpec::new("country", FieldType::Text).default(Value::Text("中国".to_string())),
            )
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            street: record.text("street")?.to_string(),
            city: record.text("city")?.to_string(),
            postal_code: record.text("postal_code")?.to_string(),
            country: record.text("country")?.to_string(),
        })
    }
}

/// Lifecycle state of a customer account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerStatus {
    Active,
    Inactive,
    Suspended,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [
        CustomerStatus::Active,
        CustomerStatus::Inactive,
        CustomerStatus::Suspended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerStatus::Active => "active",
            CustomerStatus::Inactive => "inactive",
            CustomerStatus::Suspended => "suspended",
        }
    }

    pub fn enum_spec() -> EnumSpec {
        EnumSpec::new(
            "customer_status",
            Self::ALL.iter().map(CustomerStatus::as_str),
        )
    }
}

impl fmt::Display for CustomerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == label)
            .ok_or_else(|| Error::InvalidSpec(format!("unknown customer status '{label}'")))
    }
}

/// Customer with a nested address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Address,
    pub status: CustomerStatus,
    pub join_date: DateTime<Utc>,
}

impl Model for Customer {
    const NAME: &'static str = "customer";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Customer with a nested address")
            .field(FieldSpec::new("name", FieldType::Text).min_length(1).max_length(50))
            .field(FieldSpec::new("email", FieldType::Text).pattern(r"^[^@]+@[^@]+\.[^@]+$")?)
            .field(
                FieldSpec::optional("phone", FieldType::Text)
                    .pattern(r"^1[3-9]\d{9}$")?
                    .describe("mainland China mobile number"),
            )
            .field(FieldSpec::new("address", FieldType::record(Address::spec()?)))
            .field(
                FieldSpec::new("status", FieldType::Enum(CustomerStatus::enum_spec()))
                    .default(Value::Enum(CustomerStatus::Active.as_str().to_string())),
            )
            .field(FieldSpec::new("join_date", FieldType::DateTime).default_now())
            .build()
    }

    fn register(registry: &mut ValidatorRegistry) {
        registry.register_field(Self::NAME, "email", Box::new(PermanentEmail));
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.text("name")?.to_string(),
            email: record.text("email")?.to_string(),
            phone: record.opt_text("phone")?.map(str::to_string),
            address: Address::from_record(record.record("address")?)?,
            status: record.label("status")?.parse()?,
            join_date: record.datetime("join_date")?,
        })
    }
}

struct PermanentEmail;

impl FieldValidator for PermanentEmail {
    fn id(&self) -> &'static str {
        "customer.email"
    }

    fn apply(&self, value: Value, _ctx: &ValidationContext) -> std::result::Result<Value, Rejection> {
        match value {
            Value::Text(email) => {
                let domain = email
                    .split_once('@')
                    .map(|(_, domain)| domain.to_lowercase())
                    .unwrap_or_default();
                if DISPOSABLE_DOMAINS.contains(&domain.as_str()) {
                    return Err(Rejection::new("disposable email addresses are not allowed"));
                }
                Ok(Value::Text(email.to_lowercase()))
            }
            other => Ok(other),
        }
    }
}
