use chrono::{DateTime, Datelike, Timelike, Weekday};
use polars::prelude::*;
use tracing::debug;

use crate::error::Result;
use crate::schema;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Appends the derived columns: delivery duration in minutes, total costs,
/// profit, and the order-timestamp calendar features. Timestamp ordering is
/// deliberately not validated, so durations can come out negative.
pub fn derive_features(df: &DataFrame) -> Result<DataFrame> {
    let len = df.height();

    let order_ts = df.column(schema::ORDER_TIMESTAMP)?.datetime()?;
    let delivery_ts = df.column(schema::DELIVERY_TIMESTAMP)?.datetime()?;
    let delivery_fee = df.column(schema::DELIVERY_FEE)?.f64()?;
    let discount = df.column(schema::DISCOUNTS)?.f64()?;
    let payment_fee = df.column(schema::PAYMENT_FEE)?.f64()?;
    let commission = df.column(schema::COMMISSION_FEE)?.f64()?;

    let mut duration: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut costs: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut profit: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut day_of_week: Vec<Option<&'static str>> = Vec::with_capacity(len);
    let mut hour_of_day: Vec<Option<i32>> = Vec::with_capacity(len);

    for idx in 0..len {
        duration.push(match (order_ts.get(idx), delivery_ts.get(idx)) {
            (Some(order_ms), Some(delivery_ms)) => {
                Some((delivery_ms - order_ms) as f64 / MILLIS_PER_MINUTE)
            }
            _ => None,
        });

        let cost = match (delivery_fee.get(idx), discount.get(idx), payment_fee.get(idx)) {
            (Some(fee), Some(disc), Some(pay)) => Some(fee + disc + pay),
            _ => None,
        };
        costs.push(cost);
        profit.push(match (commission.get(idx), cost) {
            (Some(comm), Some(cost)) => Some(comm - cost),
            _ => None,
        });

        match order_ts.get(idx).and_then(DateTime::from_timestamp_millis) {
            Some(ts) => {
                day_of_week.push(Some(day_name(ts.weekday())));
                hour_of_day.push(Some(ts.hour() as i32));
            }
            None => {
                day_of_week.push(None);
                hour_of_day.push(None);
            }
        }
    }

    let mut output = df.clone();
    output.hstack_mut(&mut [
        Series::new(schema::DURATION_MINS.into(), duration).into(),
        Series::new(schema::COSTS.into(), costs).into(),
        Series::new(schema::PROFIT.into(), profit).into(),
        Series::new(schema::DAY_OF_WEEK.into(), day_of_week).into(),
        Series::new(schema::HOUR_OF_DAY.into(), hour_of_day).into(),
    ])?;

    debug!(rows = len, "derived duration, cost, profit, and calendar columns");
    Ok(output)
}

pub const DAY_ORDER: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
