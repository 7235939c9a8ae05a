use modelcheck_core::Result;
use modelcheck_validate::ValidatedRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::{Value as JsonValue, json};

use crate::model::Model;
use crate::orders::Order;
use crate::params::{ItemDetailsQuery, ItemsFilter, ModelPath, SquareParams, UserItemPath};
use crate::products::{Item, Product};

/// Values computed from a validated record, keyed by the record's model.
///
/// Monetary amounts are rounded to `money_scale` places and rendered as
/// strings. Returns `None` for models without derived values.
pub fn derived_values(record: &ValidatedRecord, money_scale: u32) -> Result<Option<JsonValue>> {
    let money = |amount: Decimal| {
        let mut rounded =
            amount.round_dp_with_strategy(money_scale, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(money_scale);
        rounded.to_string()
    };

    let derived = match record.name() {
        name if name == Order::NAME => {
            let summary = Order::from_record(record)?.summary()?.rounded(money_scale);
            json!({
                "item_count": summary.item_count,
                "subtotal": summary.subtotal.to_string(),
                "discount": summary.discount.to_string(),
                "total_amount": summary.total_amount.to_string(),
            })
        }
        name if name == Product::NAME => {
            let product = Product::from_record(record)?;
            json!({ "final_price": money(product.final_price()) })
        }
        name if name == Item::NAME => {
            let item = Item::from_record(record)?;
            json!({ "price_with_tax": item.price_with_tax()?.map(money) })
        }
        name if name == SquareParams::NAME => {
            let params = SquareParams::from_record(record)?;
            json!({ "square": params.square() })
        }
        name if name == ModelPath::NAME => {
            let path = ModelPath::from_record(record)?;
            json!({
                "model_name": path.model_name.as_str(),
                "message": path.model_name.message(),
            })
        }
        name if name == UserItemPath::NAME => {
            let path = UserItemPath::from_record(record)?;
            json!({ "message": path.message() })
        }
        name if name == ItemsFilter::NAME => {
            let filter = ItemsFilter::from_record(record)?;
            json!({ "message": filter.message() })
        }
        name if name == ItemDetailsQuery::NAME => {
            let details = ItemDetailsQuery::from_record(record)?.details();
            json!({ "details": details })
        }
        _ => return Ok(None),
    };
    Ok(Some(derived))
}
