use std::env;
use std::path::{Path, PathBuf};

use modelcheck_core::ValidationReport;
use modelcheck_models::{ModelCatalog, ModelError, Order};
use modelcheck_validate::ValidationContext;
use serde_json::Value;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let order_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .ok_or("missing order path")?;

    let input = load_json(&order_path)?;
    let catalog = ModelCatalog::standard()?;

    let order: Order = match catalog.parse(&input, ValidationContext::default()) {
        Ok(order) => order,
        Err(ModelError::Invalid(report)) => {
            eprintln!("order validation failed");
            print_report(&report);
            std::process::exit(1);
        }
        Err(err) => return Err(err.into()),
    };

    let summary = order.summary()?.rounded(2);
    println!(
        "{} item(s), subtotal {}, discount {}, total {}",
        summary.item_count, summary.subtotal, summary.discount, summary.total_amount
    );
    Ok(())
}

fn load_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let json = serde_json::from_str(&contents)?;
    Ok(json)
}

fn print_report(report: &ValidationReport) {
    for violation in report {
        eprintln!(
            "{:?} {} [{}]: {}",
            violation.kind, violation.path, violation.rule, violation.message
        );
    }
}
