//! Path and query parameter records.
//!
//! Inputs usually arrive as strings (`"42"`, `"true"`) and are coerced to the
//! declared field types by the validation engine.

use std::fmt;
use std::str::FromStr;

use modelcheck_core::{EnumSpec, Error, FieldSpec, FieldType, Record, RecordSpec, Result, Value};
use serde::Serialize;

use crate::model::Model;

const ITEM_DESCRIPTION: &str = "这是一个很长的描述，包含物品的详细信息...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemPath {
    pub item_id: i64,
}

impl Model for ItemPath {
    const NAME: &'static str = "item_path";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::new("item_id", FieldType::Int))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            item_id: record.int("item_id")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserItemPath {
    pub user_id: i64,
    pub item_id: String,
}

impl UserItemPath {
    pub fn message(&self) -> String {
        format!("用户{} 的物品 {}", self.user_id, self.item_id)
    }
}

impl Model for UserItemPath {
    const NAME: &'static str = "user_item_path";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::new("user_id", FieldType::Int))
            .field(FieldSpec::new("item_id", FieldType::Text))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            user_id: record.int("user_id")?,
            item_id: record.text("item_id")?.to_string(),
        })
    }
}

/// Optional `type` filter on the item listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemsFilter {
    pub kind: Option<String>,
}

impl ItemsFilter {
    /// The filter itself, or "没传" when it is absent or empty.
    pub fn message(&self) -> &str {
        self.kind
            .as_deref()
            .filter(|kind| !kind.is_empty())
            .unwrap_or("没传")
    }
}

impl Model for ItemsFilter {
    const NAME: &'static str = "items_filter";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::optional("type", FieldType::Text))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            kind: record.opt_text("type")?.map(str::to_string),
        })
    }
}

/// Model architectures accepted by [`ModelPath`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelName {
    Alexnet,
    Resnet,
    Lenet,
}

impl ModelName {
    pub const ALL: [ModelName; 3] = [ModelName::Alexnet, ModelName::Resnet, ModelName::Lenet];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelName::Alexnet => "alexnet",
            ModelName::Resnet => "resnet",
            ModelName::Lenet => "lenet",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ModelName::Alexnet => "深度学习FTW!",
            ModelName::Lenet => "LeCNN 所有的图像",
            ModelName::Resnet => "有一些剩余",
        }
    }

    pub fn enum_spec() -> EnumSpec {
        EnumSpec::new("model_name", Self::ALL.iter().map(ModelName::as_str))
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelName {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|name| name.as_str() == label)
            .ok_or_else(|| Error::InvalidSpec(format!("unknown model name '{label}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelPath {
    pub model_name: ModelName,
}

impl Model for ModelPath {
    const NAME: &'static str = "model_path";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::new("model_name", FieldType::Enum(ModelName::enum_spec())))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            model_name: record.label("model_name")?.parse()?,
        })
    }
}

/// Offset pagination, `skip=0&limit=10` unless given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub skip: i64,
    pub limit: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: 10 }
    }
}

impl Model for Pagination {
    const NAME: &'static str = "pagination";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::new("skip", FieldType::Int).default(Value::Int(0)))
            .field(FieldSpec::new("limit", FieldType::Int).default(Value::Int(10)))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            skip: record.int("skip")?,
            limit: record.int("limit")?,
        })
    }
}

/// Item lookup where `q` must be present but may be null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetailsQuery {
    pub item_id: i64,
    pub q: Option<String>,
    pub short: bool,
}

/// Response body assembled from an [`ItemDetailsQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemDetails {
    pub item_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,
}

impl ItemDetailsQuery {
    /// Echo a non-empty `q`; attach the long description unless `short`.
    pub fn details(&self) -> ItemDetails {
        ItemDetails {
            item_id: self.item_id,
            q: self.q.clone().filter(|q| !q.is_empty()),
            description: (!self.short).then_some(ITEM_DESCRIPTION),
        }
    }
}

impl Model for ItemDetailsQuery {
    const NAME: &'static str = "item_details_query";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::new("item_id", FieldType::Int))
            .field(FieldSpec::new("q", FieldType::optional(FieldType::Text)))
            .field(FieldSpec::new("short", FieldType::Bool).default(Value::Bool(false)))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            item_id: record.int("item_id")?,
            q: record.opt_text("q")?.map(str::to_string),
            short: record.bool("short")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequiredQuery {
    pub item_id: i64,
    pub needy: String,
}

impl Model for RequiredQuery {
    const NAME: &'static str = "required_query";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::new("item_id", FieldType::Int))
            .field(FieldSpec::new("needy", FieldType::Text))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            item_id: record.int("item_id")?,
            needy: record.text("needy")?.to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SquareParams {
    pub num: i64,
}

impl SquareParams {
    /// `num * num`, `None` on overflow.
    pub fn square(&self) -> Option<i64> {
        self.num.checked_mul(self.num)
    }
}

impl Model for SquareParams {
    const NAME: &'static str = "square";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .field(FieldSpec::new("num", FieldType::Int))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            num: record.int("num")?,
        })
    }
}
