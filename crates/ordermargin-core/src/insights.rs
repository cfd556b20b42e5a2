use comfy_table::{presets::UTF8_FULL, Cell, Table};
use polars::prelude::*;

use crate::error::Result;
use crate::schema;
use crate::stats;

pub const AVG_PROFIT: &str = "Average Profit";

pub const COST_COMPONENTS: [&str; 3] = [
    schema::DELIVERY_FEE,
    schema::PAYMENT_FEE,
    schema::DISCOUNTS,
];

/// Cost-component totals in fixed column order (the pie chart keeps this
/// order so slice colors stay stable across datasets).
pub fn cost_component_totals(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    COST_COMPONENTS
        .iter()
        .map(|name| {
            let total: f64 = stats::non_null_values(df, name)?.iter().sum();
            Ok((name.to_string(), total))
        })
        .collect()
}

/// Cost-component totals ranked highest to lowest.
pub fn cost_breakdown(df: &DataFrame) -> Result<Vec<(String, f64)>> {
    let mut breakdown = cost_component_totals(df)?;
    breakdown.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    Ok(breakdown)
}

/// Mean profit per day-of-week name, sorted descending by the mean.
pub fn average_profit_by_day(df: &DataFrame) -> Result<DataFrame> {
    group_mean_profit(df, schema::DAY_OF_WEEK)
}

/// Mean profit per hour of day, sorted descending by the mean.
pub fn average_profit_by_hour(df: &DataFrame) -> Result<DataFrame> {
    group_mean_profit(df, schema::HOUR_OF_DAY)
}

fn group_mean_profit(df: &DataFrame, key: &str) -> Result<DataFrame> {
    let grouped = df
        .clone()
        .lazy()
        .filter(col(key).is_not_null())
        .group_by([col(key)])
        .agg([col(schema::PROFIT).mean().alias(AVG_PROFIT)])
        .sort(
            [AVG_PROFIT],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true),
        )
        .collect()?;
    Ok(grouped)
}

pub fn breakdown_table(breakdown: &[(String, f64)]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Cost Component", "Total"]);
    for (name, total) in breakdown {
        table.add_row(vec![Cell::new(name), Cell::new(format!("{total:.2}"))]);
    }
    table
}

pub fn group_mean_table(grouped: &DataFrame, key: &str) -> Result<Table> {
    let key_column = grouped.column(key)?;
    let means = grouped.column(AVG_PROFIT)?.f64()?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![key, AVG_PROFIT]);
    for idx in 0..grouped.height() {
        let label = key_column.get(idx)?.str_value().to_string();
        let mean = means
            .get(idx)
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![Cell::new(label), Cell::new(mean)]);
    }
    Ok(table)
}
