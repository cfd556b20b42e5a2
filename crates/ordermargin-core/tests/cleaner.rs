use ordermargin_core::error::PipelineError;
use ordermargin_core::{cleaner, loader, schema};
use polars::prelude::*;

const HEADER: &str = "Order Date and Time,Delivery Date and Time,Discounts and Offers,Order Value,Delivery Fee,Payment Processing Fee,Commission Fee";

fn frame_with_discounts(rows: &[(&str, f64)]) -> DataFrame {
    let mut csv = String::from(HEADER);
    for (discount, order_value) in rows {
        csv.push_str(&format!(
            "\n2024-02-01 12:00:00,2024-02-01 12:45:00,{},{},30,10,90",
            discount, order_value
        ));
    }
    loader::load_orders_from_bytes(csv.as_bytes()).expect("fixture loads")
}

fn cleaned_discounts(df: &DataFrame) -> Vec<Option<f64>> {
    df.column(schema::DISCOUNTS)
        .unwrap()
        .f64()
        .unwrap()
        .iter()
        .collect()
}

#[test]
fn percent_signed_text_converts_against_order_value() {
    let df = frame_with_discounts(&[("10 % OFF", 200.0)]);
    let cleaned = cleaner::normalize_discounts(&df).unwrap();
    assert!((cleaned_discounts(&cleaned)[0].unwrap() - 20.0).abs() < 1e-9);
}

#[test]
fn large_absolute_amounts_pass_through() {
    let df = frame_with_discounts(&[("50", 100.0)]);
    let cleaned = cleaner::normalize_discounts(&df).unwrap();
    assert!((cleaned_discounts(&cleaned)[0].unwrap() - 50.0).abs() < 1e-9);
}

#[test]
fn small_signless_values_count_as_percentages() {
    let df = frame_with_discounts(&[("5", 300.0)]);
    let cleaned = cleaner::normalize_discounts(&df).unwrap();
    assert!((cleaned_discounts(&cleaned)[0].unwrap() - 15.0).abs() < 1e-9);
}

#[test]
fn percent_values_above_threshold_keep_their_face_value() {
    // "50%" is unambiguously a percentage, but the inherited rule only
    // reinterprets values at or below the threshold.
    let df = frame_with_discounts(&[("50% off", 100.0)]);
    let cleaned = cleaner::normalize_discounts(&df).unwrap();
    assert!((cleaned_discounts(&cleaned)[0].unwrap() - 50.0).abs() < 1e-9);
}

#[test]
fn threshold_boundary_is_inclusive() {
    let df = frame_with_discounts(&[("15", 200.0)]);
    let cleaned = cleaner::normalize_discounts(&df).unwrap();
    assert!((cleaned_discounts(&cleaned)[0].unwrap() - 30.0).abs() < 1e-9);
}

#[test]
fn missing_discounts_become_zero() {
    let df = frame_with_discounts(&[("", 200.0), ("50", 100.0)]);
    let cleaned = cleaner::normalize_discounts(&df).unwrap();
    let values = cleaned_discounts(&cleaned);
    assert!((values[0].unwrap() - 0.0).abs() < 1e-9);
    assert!((values[1].unwrap() - 50.0).abs() < 1e-9);
}

#[test]
fn non_finite_discount_tokens_become_zero() {
    // "nan" and "inf" parse as f64 but would poison every downstream sum.
    let df = frame_with_discounts(&[("nan", 200.0), ("inf", 200.0), ("50", 100.0)]);
    let cleaned = cleaner::normalize_discounts(&df).unwrap();
    let values = cleaned_discounts(&cleaned);
    assert!((values[0].unwrap() - 0.0).abs() < 1e-9);
    assert!((values[1].unwrap() - 0.0).abs() < 1e-9);
    assert!((values[2].unwrap() - 50.0).abs() < 1e-9);
}

#[test]
fn unparseable_discount_text_is_an_error() {
    let df = frame_with_discounts(&[("FREEDEL", 200.0)]);
    let err = cleaner::normalize_discounts(&df).unwrap_err();
    assert!(matches!(err, PipelineError::Processing(_)));
}
