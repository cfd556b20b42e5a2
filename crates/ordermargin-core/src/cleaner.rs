use polars::prelude::*;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::schema;

// Parsed values at or below this are treated as percentages of the order
// value, whether or not the raw text carried a '%' sign. Inherited from the
// upstream data-cleaning rules; do not "fix" without revalidating the dataset.
const PERCENT_THRESHOLD: f64 = 15.0;

/// Replaces the raw "Discounts and Offers" strings with absolute currency
/// amounts. Missing values become 0.0; text that cannot be parsed at all is a
/// hard error.
pub fn normalize_discounts(df: &DataFrame) -> Result<DataFrame> {
    let len = df.height();
    let raw = df.column(schema::DISCOUNTS)?.cast(&DataType::String)?;
    let raw = raw.str()?;
    let order_value = df.column(schema::ORDER_VALUE)?.f64()?;

    let mut cleaned: Vec<f64> = Vec::with_capacity(len);
    let mut reinterpreted = 0usize;

    for idx in 0..len {
        let parsed = match raw.get(idx) {
            Some(text) => {
                let value = parse_discount_token(text).ok_or_else(|| {
                    PipelineError::Processing(format!(
                        "unparseable discount value '{}' at row {}",
                        text, idx
                    ))
                })?;
                // "nan"/"inf" tokens parse, but a non-finite discount is
                // unusable; treat them like missing values.
                value.is_finite().then_some(value)
            }
            None => None,
        };

        let amount = match parsed {
            Some(value) if value <= PERCENT_THRESHOLD => {
                reinterpreted += 1;
                (value / 100.0) * order_value.get(idx).unwrap_or(0.0)
            }
            Some(value) => value,
            None => 0.0,
        };
        cleaned.push(amount);
    }

    debug!(
        rows = len,
        reinterpreted, "normalized discount column to currency amounts"
    );

    let mut output = df.clone();
    output.with_column(Series::new(schema::DISCOUNTS.into(), cleaned))?;
    Ok(output)
}

/// First whitespace-delimited token of the raw value; a '%' anywhere in the
/// token marks it as percentage-coded (the sign is stripped before parsing).
fn parse_discount_token(text: &str) -> Option<f64> {
    let token = text.split_whitespace().next()?;
    if token.contains('%') {
        token.replace('%', "").parse::<f64>().ok()
    } else {
        token.parse::<f64>().ok()
    }
}
