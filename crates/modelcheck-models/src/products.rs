use modelcheck_core::{Error, FieldSpec, FieldType, Record, RecordSpec, Result, Value};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::Model;

/// Minimal catalogue item with an optional tax amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub tax: Option<Decimal>,
}

impl Item {
    /// `price + tax` when a non-zero tax is set.
    pub fn price_with_tax(&self) -> Result<Option<Decimal>> {
        self.tax
            .filter(|tax| !tax.is_zero())
            .map(|tax| {
                self.price
                    .checked_add(tax)
                    .ok_or_else(|| Error::Overflow("item.price_with_tax".to_string()))
            })
            .transpose()
    }
}

impl Model for Item {
    const NAME: &'static str = "item";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Catalogue item")
            .field(FieldSpec::new("name", FieldType::Text))
            .field(FieldSpec::optional("description", FieldType::Text))
            .field(FieldSpec::new("price", FieldType::Decimal))
            .field(FieldSpec::optional("tax", FieldType::Decimal))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            name: record.text("name")?.to_string(),
            description: record.opt_text("description")?.map(str::to_string),
            price: record.decimal("price")?,
            tax: record.opt_decimal("tax")?,
        })
    }
}

/// Product with price bounds, an optional percentage discount and tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub discount: Option<Decimal>,
    pub tags: Vec<String>,
    pub in_stock: bool,
}

impl Product {
    /// Price after applying a non-zero percentage discount.
    pub fn final_price(&self) -> Decimal {
        match self.discount {
            Some(discount) if !discount.is_zero() => {
                self.price * (Decimal::ONE - discount / Decimal::ONE_HUNDRED)
            }
            _ => self.price,
        }
    }
}

impl Model for Product {
    const NAME: &'static str = "product";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Product with validated pricing")
            .field(
                FieldSpec::new("name", FieldType::Text)
                    .min_length(1)
                    .max_length(100)
                    .describe("product name"),
            )
            .field(
                FieldSpec::optional("description", FieldType::Text)
                    .max_length(500)
                    .describe("product description"),
            )
            .field(
                FieldSpec::new("price", FieldType::Decimal)
                    .gt(0)
                    .le(1_000_000)
                    .describe("unit price, must be positive"),
            )
            .field(
                FieldSpec::optional("discount", FieldType::Decimal)
                    .ge(0)
                    .le(100)
                    .describe("discount percentage"),
            )
            .field(
                FieldSpec::new("tags", FieldType::list(FieldType::Text))
                    .default(Value::List(Vec::new())),
            )
            .field(FieldSpec::new("in_stock", FieldType::Bool).default(Value::Bool(true)))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        let tags = record
            .list("tags")?
            .iter()
            .filter_map(|tag| tag.as_text().map(str::to_string))
            .collect();
        Ok(Self {
            name: record.text("name")?.to_string(),
            description: record.opt_text("description")?.map(str::to_string),
            price: record.decimal("price")?,
            discount: record.opt_decimal("discount")?,
            tags,
            in_stock: record.bool("in_stock")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn decimal(text: &str) -> Decimal {
        Decimal::from_str(text).expect("decimal literal")
    }

    fn product(discount: Option<&str>) -> Product {
        Product {
            name: "Desk".to_string(),
            description: None,
            price: decimal("250.00"),
            discount: discount.map(decimal),
            tags: Vec::new(),
            in_stock: true,
        }
    }

    #[test]
    fn final_price_applies_discount() {
        assert_eq!(product(Some("20")).final_price(), decimal("200"));
        assert_eq!(product(Some("0")).final_price(), decimal("250"));
        assert_eq!(product(None).final_price(), decimal("250"));
    }

    #[test]
    fn price_with_tax_requires_non_zero_tax() {
        let mut item = Item {
            name: "Pen".to_string(),
            description: None,
            price: decimal("1.50"),
            tax: Some(decimal("0.15")),
        };
        assert_eq!(item.price_with_tax(), Ok(Some(decimal("1.65"))));
        item.tax = Some(Decimal::ZERO);
        assert_eq!(item.price_with_tax(), Ok(None));
    }

    #[test]
    fn price_with_tax_overflow_is_an_error() {
        let item = Item {
            name: "Vault".to_string(),
            description: None,
            price: Decimal::MAX,
            tax: Some(Decimal::ONE),
        };
        assert!(matches!(item.price_with_tax(), Err(Error::Overflow(_))));
    }
}
