use polars::prelude::*;

use crate::error::{PipelineError, Result};

// Raw CSV header names. The dataset ships with spaces in the headers, so the
// constants carry them verbatim rather than snake_casing on load.
pub const ORDER_TIMESTAMP: &str = "Order Date and Time";
pub const DELIVERY_TIMESTAMP: &str = "Delivery Date and Time";
pub const DISCOUNTS: &str = "Discounts and Offers";
pub const ORDER_VALUE: &str = "Order Value";
pub const DELIVERY_FEE: &str = "Delivery Fee";
pub const PAYMENT_FEE: &str = "Payment Processing Fee";
pub const COMMISSION_FEE: &str = "Commission Fee";

// Derived columns.
pub const DURATION_MINS: &str = "Delivery Duration (mins)";
pub const COSTS: &str = "Costs";
pub const PROFIT: &str = "Profit";
pub const DAY_OF_WEEK: &str = "Day of Week";
pub const HOUR_OF_DAY: &str = "Hour of Day";

pub const REQUIRED_COLUMNS: [&str; 7] = [
    ORDER_TIMESTAMP,
    DELIVERY_TIMESTAMP,
    DISCOUNTS,
    ORDER_VALUE,
    DELIVERY_FEE,
    PAYMENT_FEE,
    COMMISSION_FEE,
];

/// Fails with the first missing required column rather than a generic polars
/// column-not-found later in the pipeline.
pub fn check_required_columns(df: &DataFrame) -> Result<()> {
    let names = df.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == required) {
            return Err(PipelineError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

/// Casts the fee/value columns to Float64 so integer-typed CSV columns behave
/// like the rest of the currency math.
pub fn currency_column_exprs() -> Vec<Expr> {
    [ORDER_VALUE, DELIVERY_FEE, PAYMENT_FEE, COMMISSION_FEE]
        .iter()
        .map(|name| col(*name).cast(DataType::Float64))
        .collect()
}
