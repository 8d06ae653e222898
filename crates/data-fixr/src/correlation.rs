//! Pairwise correlation report over the numeric columns of a table.
//!
//! The report is long-format: one row per unordered pair of distinct numeric
//! columns, walked in left-to-right column order over the upper triangle of
//! the correlation matrix. Missing cells are handled pairwise: a row only
//! contributes to the coefficient of a pair when both of its values are
//! present.

use crate::config::CorrelationMethod;
use crate::error::{FixrError, Result};
use crate::types::CorrelationPair;
use crate::utils::{average_ranks, mean, numeric_values, partition_columns};
use polars::prelude::*;
use tracing::{debug, warn};

/// Compute the long-format correlation report for `df`.
///
/// The result has the columns `feature_1`, `feature_2`, `correlation` and
/// `abs_correlation`, and `k * (k - 1) / 2` rows for `k` numeric columns.
///
/// # Errors
///
/// [`FixrError::Value`] if fewer than two numeric columns are present.
pub fn correlation_report(df: &DataFrame, method: CorrelationMethod) -> Result<DataFrame> {
    let pairs = correlation_pairs(df, method)?;

    let mut feature_1 = Vec::with_capacity(pairs.len());
    let mut feature_2 = Vec::with_capacity(pairs.len());
    let mut correlation = Vec::with_capacity(pairs.len());
    let mut abs_correlation = Vec::with_capacity(pairs.len());
    for pair in pairs {
        feature_1.push(pair.feature_1);
        feature_2.push(pair.feature_2);
        correlation.push(pair.correlation);
        abs_correlation.push(pair.abs_correlation);
    }

    let report = df![
        "feature_1" => feature_1,
        "feature_2" => feature_2,
        "correlation" => correlation,
        "abs_correlation" => abs_correlation,
    ]?;
    Ok(report)
}

/// Same content as [`correlation_report`], as typed records.
pub fn correlation_pairs(df: &DataFrame, method: CorrelationMethod) -> Result<Vec<CorrelationPair>> {
    let (numeric, _) = partition_columns(df);
    if numeric.len() < 2 {
        return Err(FixrError::Value(format!(
            "At least two numeric columns are required for correlation, found {}.",
            numeric.len()
        )));
    }

    let columns = numeric
        .iter()
        .map(|col| Ok((col.name().to_string(), numeric_values(col)?)))
        .collect::<Result<Vec<_>>>()?;

    let mut pairs = Vec::with_capacity(columns.len() * (columns.len() - 1) / 2);
    for i in 0..columns.len() {
        for j in (i + 1)..columns.len() {
            let (name_i, values_i) = &columns[i];
            let (name_j, values_j) = &columns[j];
            let (x, y) = complete_pairs(values_i, values_j);
            let correlation = coefficient(method, &x, &y);
            if correlation.is_nan() {
                warn!(
                    "Correlation between '{}' and '{}' is undefined ({} complete pairs)",
                    name_i,
                    name_j,
                    x.len()
                );
            }
            pairs.push(CorrelationPair {
                feature_1: name_i.clone(),
                feature_2: name_j.clone(),
                correlation,
                abs_correlation: correlation.abs(),
            });
        }
    }

    debug!(
        "Computed {} {} correlations over {} numeric columns",
        pairs.len(),
        method,
        columns.len()
    );
    Ok(pairs)
}

/// Keep only the rows where both values are present.
fn complete_pairs(a: &[Option<f64>], b: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
    a.iter()
        .zip(b)
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .unzip()
}

fn coefficient(method: CorrelationMethod, x: &[f64], y: &[f64]) -> f64 {
    match method {
        CorrelationMethod::Pearson => pearson(x, y),
        CorrelationMethod::Spearman => pearson(&average_ranks(x), &average_ranks(y)),
        CorrelationMethod::Kendall => kendall_tau_b(x, y),
    }
}

/// Pearson's r. NaN when fewer than two pairs or either side is constant.
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let (Some(mean_x), Some(mean_y)) = (mean(x), mean(y)) else {
        return f64::NAN;
    };
    if x.len() < 2 {
        return f64::NAN;
    }

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    bounded(cov / denom)
}

/// Kendall's tau-b, which corrects the denominator for ties on either side.
fn kendall_tau_b(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }

    let mut concordant = 0i64;
    let mut discordant = 0i64;
    let mut ties_x = 0i64;
    let mut ties_y = 0i64;
    for i in 0..n {
        for j in (i + 1)..n {
            let dx = x[i] - x[j];
            let dy = y[i] - y[j];
            match (dx == 0.0, dy == 0.0) {
                (true, true) => {}
                (true, false) => ties_x += 1,
                (false, true) => ties_y += 1,
                (false, false) => {
                    if (dx > 0.0) == (dy > 0.0) {
                        concordant += 1;
                    } else {
                        discordant += 1;
                    }
                }
            }
        }
    }

    // Pairs tied on both sides count in neither factor.
    let untied_x = (concordant + discordant + ties_y) as f64;
    let untied_y = (concordant + discordant + ties_x) as f64;
    let denom = (untied_x * untied_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    bounded((concordant - discordant) as f64 / denom)
}

fn bounded(r: f64) -> f64 {
    r.clamp(-1.0, 1.0)
}
