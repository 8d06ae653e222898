//! Outlier flagging for numeric columns.
//!
//! Each numeric column is analyzed on its own with either the z-score rule or
//! the IQR (Tukey fence) rule. The result keeps the numeric columns unchanged
//! and appends one boolean `<col>_outlier` column per numeric column.

use crate::config::{AnomalyMethod, CleaningConfig, IQR_MULTIPLIER, ZSCORE_THRESHOLD};
use crate::error::{FixrError, Result};
use crate::utils::{mean, numeric_values, partition_columns, quantile, sample_std, sorted};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Minimum number of values a numeric column needs to be analyzed.
pub const MIN_DATA_POINTS: usize = 3;

/// Outlier detector carrying the thresholds of both rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnomalyDetector {
    /// `|z|` above which a value is flagged.
    pub zscore_threshold: f64,
    /// Multiplier applied to the IQR to build the fences.
    pub iqr_multiplier: f64,
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self {
            zscore_threshold: ZSCORE_THRESHOLD,
            iqr_multiplier: IQR_MULTIPLIER,
        }
    }
}

impl From<&CleaningConfig> for AnomalyDetector {
    fn from(config: &CleaningConfig) -> Self {
        Self {
            zscore_threshold: config.zscore_threshold,
            iqr_multiplier: config.iqr_multiplier,
        }
    }
}

impl AnomalyDetector {
    /// Flag outliers in every numeric column of `df`.
    ///
    /// Returns the result table and the percentage of flagged cells over all
    /// numeric cells. Non-numeric columns are dropped from the result.
    ///
    /// # Errors
    ///
    /// - [`FixrError::Type`] if the table has no columns or no numeric columns.
    /// - [`FixrError::Value`] if the table has no rows, or a numeric column has
    ///   missing values or fewer than [`MIN_DATA_POINTS`] values.
    pub fn detect(&self, df: &DataFrame, method: AnomalyMethod) -> Result<(DataFrame, f64)> {
        if df.width() == 0 {
            return Err(FixrError::Type(
                "Input must be a non-empty DataFrame, got an empty DataFrame".to_string(),
            ));
        }

        let (numeric, _) = partition_columns(df);
        if numeric.is_empty() {
            return Err(FixrError::Type(
                "Input DataFrame has no numeric columns found to analyze".to_string(),
            ));
        }
        if df.height() == 0 {
            return Err(FixrError::Value(
                "No data points found for numeric columns".to_string(),
            ));
        }

        let mut columns_values = Vec::with_capacity(numeric.len());
        for col in &numeric {
            if col.null_count() > 0 {
                return Err(FixrError::Value(format!(
                    "Numeric column '{}' contains NaN values",
                    col.name()
                )));
            }
            if col.len() < MIN_DATA_POINTS {
                return Err(FixrError::Value(format!(
                    "Not enough data points for numeric columns: '{}' has {}, need at least {}",
                    col.name(),
                    col.len(),
                    MIN_DATA_POINTS
                )));
            }
            let values: Vec<f64> = numeric_values(col)?.into_iter().flatten().collect();
            columns_values.push(values);
        }

        let mut result_columns: Vec<Column> = numeric.iter().map(|col| (*col).clone()).collect();
        let mut total_flagged = 0usize;
        for (col, values) in numeric.iter().zip(&columns_values) {
            let flags = match method {
                AnomalyMethod::ZScore => self.zscore_flags(col.name(), values),
                AnomalyMethod::Iqr => self.iqr_flags(values),
            };
            let flagged = flags.iter().filter(|&&f| f).count();
            debug!("Flagged {} outliers in '{}' ({})", flagged, col.name(), method);
            total_flagged += flagged;
            result_columns.push(Column::new(format!("{}_outlier", col.name()).into(), flags));
        }

        let total_cells = df.height() * numeric.len();
        let outlier_percentage = total_flagged as f64 / total_cells as f64 * 100.0;
        debug!(
            "Anomaly detection flagged {} of {} numeric cells ({:.2}%)",
            total_flagged, total_cells, outlier_percentage
        );

        Ok((DataFrame::new(result_columns)?, outlier_percentage))
    }

    fn zscore_flags(&self, name: &str, values: &[f64]) -> Vec<bool> {
        let (Some(mean), Some(std)) = (mean(values), sample_std(values)) else {
            return vec![false; values.len()];
        };
        if std == 0.0 {
            warn!("Column '{}' is constant, no z-score outliers flagged", name);
            return vec![false; values.len()];
        }
        values
            .iter()
            .map(|v| ((v - mean) / std).abs() > self.zscore_threshold)
            .collect()
    }

    fn iqr_flags(&self, values: &[f64]) -> Vec<bool> {
        let sorted = sorted(values);
        let (Some(q1), Some(q3)) = (quantile(&sorted, 0.25), quantile(&sorted, 0.75)) else {
            return vec![false; values.len()];
        };
        let iqr = q3 - q1;
        let lower_bound = q1 - self.iqr_multiplier * iqr;
        let upper_bound = q3 + self.iqr_multiplier * iqr;
        values
            .iter()
            .map(|&v| v < lower_bound || v > upper_bound)
            .collect()
    }
}

/// Flag outliers with the default thresholds.
///
/// See [`AnomalyDetector::detect`].
pub fn detect_anomalies(df: &DataFrame, method: AnomalyMethod) -> Result<(DataFrame, f64)> {
    AnomalyDetector::default().detect(df, method)
}
