//! Tabular Data-Cleaning Utilities
//!
//! Small, stateless cleaning transforms over in-memory [Polars](polars)
//! `DataFrame`s, intended for exploratory analysis and early-stage data
//! cleaning.
//!
//! # Overview
//!
//! - **Correlation report**: pairwise Pearson, Spearman or Kendall correlations
//!   between numeric columns, as a long-format table
//! - **Anomaly detection**: per-column outlier flags (z-score or IQR) and the
//!   overall outlier rate
//! - **Missing-value imputation**: mean/median/mode for numeric columns, mode
//!   for categorical columns, and the share of cells filled
//! - **Duplicate removal**: keep-first, keep-last or drop-all duplicate rows,
//!   optionally on a subset of columns, with an optional summary
//!
//! Every transform borrows its input and returns a freshly owned table; the
//! caller's table is never modified. Inputs are validated before any work is
//! done, so a call either returns the complete result or a [`FixrError`].
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use data_fixr::{
//!     AnomalyMethod, CorrelationMethod, ImputationMethod, KeepStrategy,
//!     correlation_report, detect_anomalies, missing_values, remove_duplicates_with_report,
//! };
//! use polars::prelude::*;
//!
//! let df = df![
//!     "temperature" => [20, 21, 22, 19, 98, 23],
//!     "humidity" => [45, 50, 48, 52, 49, 200],
//! ]?;
//!
//! let report = correlation_report(&df, CorrelationMethod::Pearson)?;
//! let (flags, outlier_pct) = detect_anomalies(&df, "zscore".parse::<AnomalyMethod>()?)?;
//! let (filled, filled_pct) = missing_values(&df, ImputationMethod::Median)?;
//! let (deduped, summary) = remove_duplicates_with_report(&df, Some(&["temperature"]), KeepStrategy::Last)?;
//! ```
//!
//! # Configuration
//!
//! Use [`CleaningConfig`] with [`DataCleaner`] to fix the default methods and
//! the outlier thresholds once:
//!
//! ```rust,ignore
//! use data_fixr::{AnomalyMethod, CleaningConfig, DataCleaner};
//!
//! let cleaner = DataCleaner::new(
//!     CleaningConfig::builder()
//!         .anomaly_method(AnomalyMethod::Iqr)
//!         .iqr_multiplier(3.0)
//!         .build()?,
//! )?;
//! let (flags, pct) = cleaner.detect_anomalies(&df)?;
//! ```

pub mod anomaly;
pub mod cleaner;
pub mod config;
pub mod correlation;
pub mod duplicates;
pub mod error;
pub mod imputation;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use anomaly::{AnomalyDetector, MIN_DATA_POINTS, detect_anomalies};
pub use cleaner::DataCleaner;
pub use config::{
    AnomalyMethod, CleaningConfig, CleaningConfigBuilder, ConfigValidationError,
    CorrelationMethod, IQR_MULTIPLIER, ImputationMethod, KeepStrategy, ZSCORE_THRESHOLD,
};
pub use correlation::{correlation_pairs, correlation_report};
pub use duplicates::{remove_duplicates, remove_duplicates_with_report};
pub use error::{ErrorKind, FixrError, Result as FixrResult, ResultExt};
pub use imputation::{StatisticalImputer, missing_values};
pub use types::{ColumnKind, CorrelationPair, DuplicateSummary};
pub use utils::{is_numeric_dtype, partition_columns};
