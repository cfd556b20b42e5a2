use ordermargin_core::{cleaner, features, loader, schema};
use polars::prelude::*;

const HEADER: &str = "Order Date and Time,Delivery Date and Time,Discounts and Offers,Order Value,Delivery Fee,Payment Processing Fee,Commission Fee";

fn enriched_fixture() -> DataFrame {
    // 2024-02-01 is a Thursday; the second row delivers before it was ordered.
    let csv = format!(
        "{HEADER}\n\
         2024-02-01 12:00:00,2024-02-01 12:45:00,10 % OFF,200,30,10,90\n\
         2024-02-03 23:15:00,2024-02-03 23:05:30,50,100,20,5,40"
    );
    let df = loader::load_orders_from_bytes(csv.as_bytes()).expect("fixture loads");
    let df = cleaner::normalize_discounts(&df).expect("cleaner succeeds");
    features::derive_features(&df).expect("feature derivation succeeds")
}

fn column(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name).unwrap().f64().unwrap().iter().collect()
}

#[test]
fn duration_is_elapsed_minutes_and_may_be_negative() {
    let df = enriched_fixture();
    let duration = column(&df, schema::DURATION_MINS);
    assert!((duration[0].unwrap() - 45.0).abs() < 1e-9);
    assert!((duration[1].unwrap() - (-9.5)).abs() < 1e-9);
}

#[test]
fn costs_sum_delivery_discount_and_payment_fees() {
    let df = enriched_fixture();
    let costs = column(&df, schema::COSTS);
    // row 0: 30 + 20 (10% of 200) + 10
    assert!((costs[0].unwrap() - 60.0).abs() < 1e-9);
    // row 1: 20 + 50 + 5
    assert!((costs[1].unwrap() - 75.0).abs() < 1e-9);
}

#[test]
fn profit_is_commission_minus_costs() {
    let df = enriched_fixture();
    let profit = column(&df, schema::PROFIT);
    assert!((profit[0].unwrap() - 30.0).abs() < 1e-9);
    assert!((profit[1].unwrap() - (-35.0)).abs() < 1e-9);
}

#[test]
fn calendar_features_come_from_the_order_timestamp() {
    let df = enriched_fixture();

    let days = df.column(schema::DAY_OF_WEEK).unwrap();
    let days = days.str().unwrap();
    assert_eq!(days.get(0), Some("Thursday"));
    assert_eq!(days.get(1), Some("Saturday"));

    let hours = df.column(schema::HOUR_OF_DAY).unwrap();
    let hours = hours.i32().unwrap();
    assert_eq!(hours.get(0), Some(12));
    assert_eq!(hours.get(1), Some(23));
}

#[test]
fn null_timestamps_leave_nulls_in_derived_columns() {
    let csv = format!(
        "{HEADER}\n\
         not a timestamp,2024-02-01 12:45:00,50,200,30,10,90"
    );
    let df = loader::load_orders_from_bytes(csv.as_bytes()).expect("fixture loads");
    let df = cleaner::normalize_discounts(&df).expect("cleaner succeeds");
    let df = features::derive_features(&df).expect("feature derivation succeeds");

    assert!(column(&df, schema::DURATION_MINS)[0].is_none());
    let days = df.column(schema::DAY_OF_WEEK).unwrap();
    assert_eq!(days.str().unwrap().get(0), None);
    // financial columns are unaffected by the broken timestamp
    assert!((column(&df, schema::COSTS)[0].unwrap() - 90.0).abs() < 1e-9);
}
