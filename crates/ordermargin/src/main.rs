use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ordermargin_core::config::AnalysisConfig;
use ordermargin_core::{charts, cleaner, features, insights, loader, report, schema};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Profitability analysis for food-delivery transaction exports.
#[derive(Parser, Debug)]
#[command(author, version, about = "Delivery-order cost and profit analysis", long_about = None)]
struct Cli {
    /// Path to the transactions CSV.
    #[arg(short, long)]
    input: PathBuf,

    /// Directory the rendered charts are written to.
    #[arg(long, default_value = "charts")]
    charts_dir: PathBuf,

    /// Skip chart rendering and only print the console report.
    #[arg(long)]
    skip_charts: bool,

    /// Optional TOML file overriding the analysis defaults.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AnalysisConfig::from_path(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let df = loader::load_orders(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    let df = cleaner::normalize_discounts(&df).context("discount normalization failed")?;
    let df = features::derive_features(&df).context("feature derivation failed")?;
    info!(rows = df.height(), "pipeline stages complete");

    println!("\nPROFIT SUMMARY");
    println!(
        "Total Profit: {:.2}",
        report::total_profit(&df).context("profit aggregation failed")?
    );

    let summary = report::profit_summary(&df)?;
    println!("\nProfit stats:\n{}", report::describe_table(&summary));

    let top = report::extremal_orders(&df, config.extremal_orders, true)?;
    println!(
        "\nTop {} Profitable Orders:\n{}",
        config.extremal_orders,
        report::orders_table(&top)?
    );

    let bottom = report::extremal_orders(&df, config.extremal_orders, false)?;
    println!(
        "\nBottom {} Loss Orders:\n{}",
        config.extremal_orders,
        report::orders_table(&bottom)?
    );

    if cli.skip_charts {
        info!("chart rendering skipped");
    } else {
        println!("\nGenerating visualizations...");
        let written = charts::render_all(&df, &config, &cli.charts_dir)
            .context("chart rendering failed")?;
        for path in &written {
            println!("  wrote {}", path.display());
        }
    }

    println!("\nINSIGHTS");
    let breakdown = insights::cost_breakdown(&df)?;
    println!(
        "\nCost Contribution (highest to lowest):\n{}",
        insights::breakdown_table(&breakdown)
    );

    let by_day = insights::average_profit_by_day(&df)?;
    println!(
        "\nAverage Profit by Day of Week:\n{}",
        insights::group_mean_table(&by_day, schema::DAY_OF_WEEK)?
    );

    let by_hour = insights::average_profit_by_hour(&df)?;
    println!(
        "\nAverage Profit by Hour of Day:\n{}",
        insights::group_mean_table(&by_hour, schema::HOUR_OF_DAY)?
    );

    Ok(())
}
