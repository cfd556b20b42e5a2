use std::io::Cursor;
use std::path::Path;

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::schema;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Reads the transactions CSV and parses both timestamp columns into
/// Datetime(Milliseconds). Unparseable timestamps become nulls; a missing
/// required column is a hard error.
pub fn load_orders(path: &Path) -> Result<DataFrame> {
    let content = std::fs::read(path)?;
    load_orders_from_bytes(&content)
}

pub fn load_orders_from_bytes(content: &[u8]) -> Result<DataFrame> {
    let cursor = Cursor::new(content);
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(cursor)
        .finish()?;

    schema::check_required_columns(&df)?;

    let df = df
        .lazy()
        .with_columns(&[
            parse_timestamp(schema::ORDER_TIMESTAMP),
            parse_timestamp(schema::DELIVERY_TIMESTAMP),
        ])
        .with_columns(schema::currency_column_exprs())
        .collect()?;

    info!(rows = df.height(), "loaded transactions dataset");
    Ok(df)
}

fn parse_timestamp(name: &str) -> Expr {
    col(name)
        .cast(DataType::String)
        .str()
        .strptime(
            DataType::Datetime(TimeUnit::Milliseconds, None),
            StrptimeOptions {
                format: Some(TIMESTAMP_FORMAT.into()),
                strict: false,
                exact: false,
                cache: true,
            },
            lit("raise"),
        )
        .alias(name)
}
