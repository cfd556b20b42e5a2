use std::path::PathBuf;

use ordermargin_core::config::AnalysisConfig;
use ordermargin_core::{charts, cleaner, features, loader};
use polars::prelude::*;

const HEADER: &str = "Order Date and Time,Delivery Date and Time,Discounts and Offers,Order Value,Delivery Fee,Payment Processing Fee,Commission Fee";

fn enriched_fixture() -> DataFrame {
    let rows = [
        ("2024-02-01 12:00:00", "2024-02-01 12:40:00", 100),
        ("2024-02-01 18:30:00", "2024-02-01 19:20:00", 120),
        ("2024-02-03 19:10:00", "2024-02-03 19:55:00", 70),
        ("2024-02-03 21:40:00", "2024-02-03 22:30:00", 50),
    ];
    let mut csv = String::from(HEADER);
    for (ordered_at, delivered_at, commission) in rows {
        csv.push_str(&format!(
            "\n{ordered_at},{delivered_at},20,150,30,10,{commission}"
        ));
    }
    let df = loader::load_orders_from_bytes(csv.as_bytes()).expect("fixture loads");
    let df = cleaner::normalize_discounts(&df).expect("cleaner succeeds");
    features::derive_features(&df).expect("feature derivation succeeds")
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ordermargin-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir
}

fn small_config() -> AnalysisConfig {
    AnalysisConfig {
        chart_width: 400,
        chart_height: 300,
        ..AnalysisConfig::default()
    }
}

#[test]
fn render_all_writes_seven_charts_and_returns_their_paths() {
    let df = enriched_fixture();
    let out_dir = scratch_dir("render-all");

    let written = charts::render_all(&df, &small_config(), &out_dir).expect("charts render");

    let names: Vec<&str> = written
        .iter()
        .map(|path| path.file_name().unwrap().to_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "cost_distribution.png",
            "commission_costs_profit.png",
            "profit_distribution.png",
            "profit_by_day.png",
            "profit_by_hour.png",
            "correlation_heatmap.png",
            "duration_vs_profit.png",
        ]
    );
    for path in &written {
        let metadata = std::fs::metadata(path).expect("chart file exists");
        assert!(metadata.len() > 0, "empty chart at {}", path.display());
    }

    std::fs::remove_dir_all(&out_dir).unwrap();
}

#[test]
fn each_chart_reports_the_path_it_rendered_to() {
    let df = enriched_fixture();
    let out_dir = scratch_dir("single-chart");
    std::fs::create_dir_all(&out_dir).unwrap();
    let config = small_config();

    let path = charts::profit_histogram(&df, &config, &out_dir).expect("histogram renders");
    assert_eq!(path, out_dir.join("profit_distribution.png"));
    assert!(path.exists());

    let path = charts::duration_vs_profit_scatter(&df, &config, &out_dir).expect("scatter renders");
    assert_eq!(path, out_dir.join("duration_vs_profit.png"));
    assert!(path.exists());

    std::fs::remove_dir_all(&out_dir).unwrap();
}
