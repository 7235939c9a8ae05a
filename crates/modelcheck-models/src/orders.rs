use std::collections::HashSet;

use modelcheck_core::{Error, FieldSpec, FieldType, Record, RecordSpec, Result, Value};
use modelcheck_validate::{RecordValidator, Rejection, ValidationContext, ValidatorRegistry};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::model::Model;

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn total_price(&self) -> Result<Decimal> {
        Decimal::from(self.quantity)
            .checked_mul(self.unit_price)
            .ok_or_else(|| overflow("order_item.total_price"))
    }
}

fn overflow(amount: &str) -> Error {
    Error::Overflow(amount.to_string())
}

impl Model for OrderItem {
    const NAME: &'static str = "order_item";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Order line")
            .field(FieldSpec::new("product_id", FieldType::Int).gt(0))
            .field(FieldSpec::new("product_name", FieldType::Text).min_length(1))
            .field(
                FieldSpec::new("quantity", FieldType::Int)
                    .gt(0)
                    .le(100)
                    .describe("units ordered, at most 100"),
            )
            .field(FieldSpec::new("unit_price", FieldType::Decimal).gt(0))
            .build()
    }

    fn from_record(record: &Record) -> Result<Self> {
        Ok(Self {
            product_id: record.int("product_id")?,
            product_name: record.text("product_name")?.to_string(),
            quantity: record.int("quantity")?,
            unit_price: record.decimal("unit_price")?,
        })
    }
}

/// Customer order with between 1 and 50 lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    pub customer_id: i64,
    pub items: Vec<OrderItem>,
    pub discount_rate: Decimal,
    pub notes: Option<String>,
}

impl Order {
    pub fn subtotal(&self) -> Result<Decimal> {
        self.items.iter().try_fold(Decimal::ZERO, |sum, item| {
            sum.checked_add(item.total_price()?)
                .ok_or_else(|| overflow("order.subtotal"))
        })
    }

    /// `subtotal * discount_rate / 100`.
    pub fn discount(&self) -> Result<Decimal> {
        self.discount_of(self.subtotal()?)
    }

    pub fn total_amount(&self) -> Result<Decimal> {
        Ok(self.summary()?.total_amount)
    }

    pub fn summary(&self) -> Result<OrderSummary> {
        let subtotal = self.subtotal()?;
        let discount = self.discount_of(subtotal)?;
        let total_amount = subtotal
            .checked_sub(discount)
            .ok_or_else(|| overflow("order.total_amount"))?;
        Ok(OrderSummary {
            item_count: self.items.len(),
            subtotal,
            discount,
            total_amount,
        })
    }

    fn discount_of(&self, subtotal: Decimal) -> Result<Decimal> {
        subtotal
            .checked_mul(self.discount_rate)
            .and_then(|amount| amount.checked_div(Decimal::ONE_HUNDRED))
            .ok_or_else(|| overflow("order.discount"))
    }
}

impl Model for Order {
    const NAME: &'static str = "order";

    fn spec() -> Result<RecordSpec> {
        RecordSpec::builder(Self::NAME)
            .describe("Customer order")
            .field(FieldSpec::new("customer_id", FieldType::Int).gt(0))
            .field(
                FieldSpec::new("items", FieldType::list(FieldType::record(OrderItem::spec()?)))
                    .min_length(1)
                    .max_length(50),
            )
            .field(
                FieldSpec::new("discount_rate", FieldType::Decimal)
                    .default(Value::Decimal(Decimal::ZERO))
                    .ge(0)
                    .le(50)
                    .describe("discount percentage"),
            )
            .field(FieldSpec::optional("notes", FieldType::Text).max_length(500))
            .build()
    }

    fn register(registry: &mut ValidatorRegistry) {
        registry.register_record(Self::NAME, Box::new(DistinctProducts));
    }

    fn from_record(record: &Record) -> Result<Self> {
        let items = record
            .list("items")?
            .iter()
            .filter_map(Value::as_record)
            .map(OrderItem::from_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            customer_id: record.int("customer_id")?,
            items,
            discount_rate: record.decimal("discount_rate")?,
            notes: record.opt_text("notes")?.map(str::to_string),
        })
    }
}

/// Derived totals of an order.
///
/// Values are exact; use [`OrderSummary::rounded`] for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub item_count: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_amount: Decimal,
}

impl OrderSummary {
    /// Round every amount to exactly `scale` places, half away from zero.
    pub fn rounded(&self, scale: u32) -> Self {
        let round = |amount: Decimal| {
            let mut rounded =
                amount.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(scale);
            rounded
        };
        Self {
            item_count: self.item_count,
            subtotal: round(self.subtotal),
            discount: round(self.discount),
            total_amount: round(self.total_amount),
        }
    }
}

struct DistinctProducts;

impl RecordValidator for DistinctProducts {
    fn id(&self) -> &'static str {
        "order.distinct_products"
    }

    fn check(&self, record: &Record, _ctx: &ValidationContext) -> std::result::Result<(), Rejection> {
        let items = record
            .list("items")
            .map_err(|err| Rejection::at("items", err.to_string()))?;
        let mut seen = HashSet::with_capacity(items.len());
        let duplicated = items
            .iter()
            .filter_map(|item| item.as_record().and_then(|item| item.get("product_id")))
            .filter_map(Value::as_int)
            .any(|product_id| !seen.insert(product_id));
        if duplicated {
            return Err(Rejection::at("items", "order contains duplicate products"));
        }
        Ok(())
    }
}
