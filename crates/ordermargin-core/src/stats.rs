use polars::prelude::*;

use crate::error::Result;

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

pub fn describe_column(df: &DataFrame, name: &str) -> Result<Describe> {
    let values = non_null_values(df, name)?;
    Ok(describe(&values))
}

pub fn describe(values: &[f64]) -> Describe {
    if values.is_empty() {
        return Describe {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = sample_std(&sorted, mean);

    Describe {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Sample standard deviation (ddof = 1), NaN for a single observation.
fn sample_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return f64::NAN;
    }
    let sum_sq = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Linear-interpolation quantile over an already sorted slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

/// Pearson correlation over rows where both columns are non-null.
pub fn pearson(df: &DataFrame, left: &str, right: &str) -> Result<f64> {
    let left_col = df.column(left)?.f64()?;
    let right_col = df.column(right)?.f64()?;

    let pairs: Vec<(f64, f64)> = left_col
        .iter()
        .zip(right_col.iter())
        .filter_map(|(a, b)| Some((a?, b?)))
        .collect();

    if pairs.len() < 2 {
        return Ok(f64::NAN);
    }

    let n = pairs.len() as f64;
    let mean_a = pairs.iter().map(|(a, _)| a).sum::<f64>() / n;
    let mean_b = pairs.iter().map(|(_, b)| b).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_a = 0.0;
    let mut var_b = 0.0;
    for (a, b) in &pairs {
        let da = a - mean_a;
        let db = b - mean_b;
        cov += da * db;
        var_a += da * da;
        var_b += db * db;
    }

    let denom = (var_a * var_b).sqrt();
    if denom == 0.0 {
        return Ok(f64::NAN);
    }
    Ok(cov / denom)
}

/// Non-null values of a Float64 column, in row order.
pub fn non_null_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df.column(name)?.f64()?;
    Ok(column.iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_hand_computed_values() {
        let values = [1.0, 2.0, 3.0, 4.0];
        let stats = describe(&values);
        assert_eq!(stats.count, 4);
        assert!((stats.mean - 2.5).abs() < 1e-9);
        // sample std of 1..4 is sqrt(5/3)
        assert!((stats.std - (5.0f64 / 3.0).sqrt()).abs() < 1e-9);
        assert!((stats.q25 - 1.75).abs() < 1e-9);
        assert!((stats.median - 2.5).abs() < 1e-9);
        assert!((stats.q75 - 3.25).abs() < 1e-9);
        assert!((stats.min - 1.0).abs() < 1e-9);
        assert!((stats.max - 4.0).abs() < 1e-9);
    }

    #[test]
    fn perfectly_correlated_columns_score_one() {
        let df = polars::df!(
            "a" => &[1.0f64, 2.0, 3.0],
            "b" => &[2.0f64, 4.0, 6.0],
        )
        .unwrap();
        let r = pearson(&df, "a", "b").unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn anti_correlated_columns_score_minus_one() {
        let df = polars::df!(
            "a" => &[1.0f64, 2.0, 3.0],
            "b" => &[6.0f64, 4.0, 2.0],
        )
        .unwrap();
        let r = pearson(&df, "a", "b").unwrap();
        assert!((r + 1.0).abs() < 1e-9);
    }
}
