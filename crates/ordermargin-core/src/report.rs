use comfy_table::{presets::UTF8_FULL, Cell, Table};
use polars::prelude::*;

use crate::error::Result;
use crate::schema;
use crate::stats::{self, Describe};

/// Sum of per-order profit over the whole dataset.
pub fn total_profit(df: &DataFrame) -> Result<f64> {
    Ok(stats::non_null_values(df, schema::PROFIT)?.iter().sum())
}

pub fn profit_summary(df: &DataFrame) -> Result<Describe> {
    stats::describe_column(df, schema::PROFIT)
}

/// The n most (descending) or least (ascending) profitable orders, selected
/// by sorting the full frame on profit and taking the head. Only the order
/// value and profit columns survive into the output.
pub fn extremal_orders(df: &DataFrame, n: usize, descending: bool) -> Result<DataFrame> {
    let selected = df
        .clone()
        .lazy()
        .select([col(schema::ORDER_VALUE), col(schema::PROFIT)])
        .sort(
            [schema::PROFIT],
            SortMultipleOptions::default()
                .with_order_descending(descending)
                .with_nulls_last(true),
        )
        .limit(n as IdxSize)
        .collect()?;
    Ok(selected)
}

pub fn describe_table(summary: &Describe) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Statistic", "Profit"]);
    table.add_row(vec![Cell::new("count"), Cell::new(summary.count)]);
    for (label, value) in [
        ("mean", summary.mean),
        ("std", summary.std),
        ("min", summary.min),
        ("25%", summary.q25),
        ("50%", summary.median),
        ("75%", summary.q75),
        ("max", summary.max),
    ] {
        table.add_row(vec![Cell::new(label), Cell::new(format!("{value:.2}"))]);
    }
    table
}

pub fn orders_table(orders: &DataFrame) -> Result<Table> {
    let order_value = orders.column(schema::ORDER_VALUE)?.f64()?;
    let profit = orders.column(schema::PROFIT)?.f64()?;

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![schema::ORDER_VALUE, schema::PROFIT]);
    for idx in 0..orders.height() {
        table.add_row(vec![
            Cell::new(format_opt(order_value.get(idx))),
            Cell::new(format_opt(profit.get(idx))),
        ]);
    }
    Ok(table)
}

fn format_opt(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}
