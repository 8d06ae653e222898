//! Configured facade over the cleaning transforms.
//!
//! [`DataCleaner`] holds a [`CleaningConfig`] and applies its defaults to each
//! transform. It also offers [`DataCleaner::clean`], which chains duplicate
//! removal and imputation and records what it did.

use crate::anomaly::AnomalyDetector;
use crate::config::CleaningConfig;
use crate::correlation::correlation_report;
use crate::duplicates::remove_duplicates_with_report;
use crate::error::{Result, ResultExt};
use crate::imputation::missing_values;
use crate::types::DuplicateSummary;
use polars::prelude::*;
use tracing::info;

/// Data cleaner applying a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct DataCleaner {
    config: CleaningConfig,
}

static_assertions::assert_impl_all!(DataCleaner: Send, Sync);

impl DataCleaner {
    /// Create a cleaner from a configuration, validating it first.
    pub fn new(config: CleaningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CleaningConfig {
        &self.config
    }

    /// Correlation report with the configured method.
    pub fn correlation_report(&self, df: &DataFrame) -> Result<DataFrame> {
        correlation_report(df, self.config.correlation_method)
    }

    /// Outlier flags with the configured method and thresholds.
    pub fn detect_anomalies(&self, df: &DataFrame) -> Result<(DataFrame, f64)> {
        AnomalyDetector::from(&self.config).detect(df, self.config.anomaly_method)
    }

    /// Missing-value imputation with the configured numeric method.
    pub fn fill_missing(&self, df: &DataFrame) -> Result<(DataFrame, f64)> {
        missing_values(df, self.config.imputation_method)
    }

    /// Duplicate removal with the configured keep strategy.
    pub fn remove_duplicates(&self, df: &DataFrame, cols: Option<&[&str]>) -> Result<DataFrame> {
        Ok(self.remove_duplicates_with_report(df, cols)?.0)
    }

    pub fn remove_duplicates_with_report(
        &self,
        df: &DataFrame,
        cols: Option<&[&str]>,
    ) -> Result<(DataFrame, DuplicateSummary)> {
        remove_duplicates_with_report(df, cols, self.config.keep)
    }

    /// Remove duplicate rows, then fill missing values.
    ///
    /// Returns the cleaned table and a human-readable list of the actions taken.
    pub fn clean(&self, df: &DataFrame) -> Result<(DataFrame, Vec<String>)> {
        let mut cleaning_actions = Vec::new();

        info!("Performing data cleaning...");

        let (df, summary) = self
            .remove_duplicates_with_report(df, None)
            .context("Removing duplicate rows")?;
        if summary.rows_removed > 0 {
            let pct = summary.rows_removed as f64 / summary.total_rows as f64 * 100.0;
            cleaning_actions.push(format!(
                "Removed {} duplicate rows ({:.1}%)",
                summary.rows_removed, pct
            ));
        } else {
            cleaning_actions.push("No duplicate rows found".to_string());
        }

        let (df, filled_percentage) = self.fill_missing(&df).context("Filling missing values")?;
        if filled_percentage > 0.0 {
            cleaning_actions.push(format!(
                "Filled {:.1}% of cells using {} for numeric columns and mode for categorical columns",
                filled_percentage, self.config.imputation_method
            ));
        } else {
            cleaning_actions.push("No missing values filled".to_string());
        }

        info!("Data cleaning complete: {} rows remain", df.height());
        Ok((df, cleaning_actions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnomalyMethod, ImputationMethod, KeepStrategy};

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = CleaningConfig {
            iqr_multiplier: -1.0,
            ..CleaningConfig::default()
        };
        let err = DataCleaner::new(config).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_configured_thresholds_are_used() {
        let df = df!["v" => [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 30.0]].unwrap();

        let default_cleaner = DataCleaner::new(
            CleaningConfig::builder()
                .anomaly_method(AnomalyMethod::Iqr)
                .build()
                .unwrap(),
        )
        .unwrap();
        let (_, pct) = default_cleaner.detect_anomalies(&df).unwrap();
        assert_eq!(pct, 10.0);

        let wide_fences = DataCleaner::new(
            CleaningConfig::builder()
                .anomaly_method(AnomalyMethod::Iqr)
                .iqr_multiplier(6.0)
                .build()
                .unwrap(),
        )
        .unwrap();
        let (_, pct) = wide_fences.detect_anomalies(&df).unwrap();
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_clean_removes_duplicates_then_fills() {
        let df = df![
            "id" => [Some(1), Some(1), Some(2), Some(3)],
            "score" => [Some(10.0), Some(10.0), None, Some(30.0)],
        ]
        .unwrap();

        let cleaner = DataCleaner::new(
            CleaningConfig::builder()
                .imputation_method(ImputationMethod::Mean)
                .keep(KeepStrategy::First)
                .build()
                .unwrap(),
        )
        .unwrap();
        let (cleaned, actions) = cleaner.clean(&df).unwrap();

        assert_eq!(cleaned.height(), 3);
        assert_eq!(cleaned.column("score").unwrap().null_count(), 0);
        assert_eq!(
            cleaned.column("score").unwrap().get(1).unwrap().try_extract::<f64>().unwrap(),
            20.0
        );
        assert!(actions[0].contains("Removed 1 duplicate rows"));
        assert!(actions[1].contains("mean"));
    }

    #[test]
    fn test_clean_reports_no_op() {
        let df = df!["id" => [1, 2, 3]].unwrap();
        let (cleaned, actions) = DataCleaner::default().clean(&df).unwrap();
        assert!(cleaned.equals_missing(&df));
        assert_eq!(actions, vec!["No duplicate rows found", "No missing values filled"]);
    }
}
