use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Analysis tunables. Everything has a default so running without a config
/// file matches the stock report.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Bin count for the profit histogram.
    pub histogram_bins: usize,
    /// Rows shown in the top/bottom profit tables.
    pub extremal_orders: usize,
    /// Pixel dimensions for rendered charts.
    pub chart_width: u32,
    pub chart_height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 25,
            extremal_orders: 5,
            chart_width: 900,
            chart_height: 600,
        }
    }
}

impl AnalysisConfig {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = toml::from_str(&content)?;
        Ok(config)
    }
}
