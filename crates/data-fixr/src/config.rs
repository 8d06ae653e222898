//! Configuration types for the cleaning transforms.
//!
//! The method enums double as the validated form of the string parameters
//! callers pass around: parsing an unsupported name fails with
//! [`FixrError::Value`]. [`CleaningConfig`] bundles the defaults used by
//! [`DataCleaner`](crate::DataCleaner) and is built with a fluent builder.

use crate::error::FixrError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Cut-off on `|z|` above which a value is flagged by the z-score rule.
pub const ZSCORE_THRESHOLD: f64 = 2.0;

/// Multiplier applied to the interquartile range to build the IQR fences.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// Correlation coefficient used by the correlation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Linear (covariance-normalized) correlation
    #[default]
    Pearson,
    /// Pearson correlation of average ranks
    Spearman,
    /// Kendall's tau-b rank concordance
    Kendall,
}

impl CorrelationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pearson => "pearson",
            Self::Spearman => "spearman",
            Self::Kendall => "kendall",
        }
    }
}

impl FromStr for CorrelationMethod {
    type Err = FixrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pearson" => Ok(Self::Pearson),
            "spearman" => Ok(Self::Spearman),
            "kendall" => Ok(Self::Kendall),
            _ => Err(FixrError::Value(format!(
                "method must be one of {{'pearson', 'spearman', 'kendall'}}, got '{s}'."
            ))),
        }
    }
}

/// Rule used to flag outliers in numeric columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AnomalyMethod {
    /// Flag values whose z-score exceeds the threshold
    #[default]
    #[serde(rename = "zscore")]
    ZScore,
    /// Flag values outside the Tukey fences (Q1 - k*IQR, Q3 + k*IQR)
    #[serde(rename = "iqr")]
    Iqr,
}

impl AnomalyMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZScore => "zscore",
            Self::Iqr => "iqr",
        }
    }
}

impl FromStr for AnomalyMethod {
    type Err = FixrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "zscore" => Ok(Self::ZScore),
            "iqr" => Ok(Self::Iqr),
            _ => Err(FixrError::Value(format!(
                "method must be either 'zscore' or 'iqr', got '{s}'"
            ))),
        }
    }
}

/// Statistic used to fill missing numeric values.
///
/// Categorical columns are always filled with their mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImputationMethod {
    /// Use the mean of non-null values
    Mean,
    /// Use the median of non-null values
    #[default]
    Median,
    /// Use the most frequent non-null value
    Mode,
}

impl ImputationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Median => "median",
            Self::Mode => "mode",
        }
    }
}

impl FromStr for ImputationMethod {
    type Err = FixrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mean" => Ok(Self::Mean),
            "median" => Ok(Self::Median),
            "mode" => Ok(Self::Mode),
            _ => Err(FixrError::Value(format!(
                "method must be one of 'mean', 'median', or 'mode', got '{s}'"
            ))),
        }
    }
}

/// Which member of a duplicate group survives duplicate removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeepStrategy {
    /// Keep the first occurrence and drop later copies
    #[default]
    #[serde(rename = "first")]
    First,
    /// Keep the last occurrence and drop earlier copies
    #[serde(rename = "last")]
    Last,
    /// Drop every row that has a duplicate
    #[serde(rename = "false")]
    None,
}

impl KeepStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::None => "false",
        }
    }
}

impl FromStr for KeepStrategy {
    type Err = FixrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::First),
            "last" => Ok(Self::Last),
            "false" | "none" => Ok(Self::None),
            _ => Err(FixrError::Value(format!(
                "keep must be one of 'first', 'last', or false, got '{s}'"
            ))),
        }
    }
}

macro_rules! impl_display_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_as_str!(CorrelationMethod, AnomalyMethod, ImputationMethod, KeepStrategy);

/// Default parameters for the cleaning transforms.
///
/// Use [`CleaningConfig::builder()`] to create a configuration with a fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use data_fixr::config::{CleaningConfig, AnomalyMethod};
///
/// let config = CleaningConfig::builder()
///     .anomaly_method(AnomalyMethod::Iqr)
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Correlation coefficient for correlation reports.
    /// Default: Pearson
    pub correlation_method: CorrelationMethod,

    /// Outlier rule for anomaly detection.
    /// Default: ZScore
    pub anomaly_method: AnomalyMethod,

    /// Numeric fill statistic for missing-value imputation.
    /// Default: Median
    pub imputation_method: ImputationMethod,

    /// Survivor policy for duplicate removal.
    /// Default: First
    pub keep: KeepStrategy,

    /// `|z|` cut-off for the z-score rule.
    /// Default: [`ZSCORE_THRESHOLD`]
    pub zscore_threshold: f64,

    /// IQR fence multiplier.
    /// Default: [`IQR_MULTIPLIER`]
    pub iqr_multiplier: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            correlation_method: CorrelationMethod::default(),
            anomaly_method: AnomalyMethod::default(),
            imputation_method: ImputationMethod::default(),
            keep: KeepStrategy::default(),
            zscore_threshold: ZSCORE_THRESHOLD,
            iqr_multiplier: IQR_MULTIPLIER,
        }
    }
}

impl CleaningConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleaningConfigBuilder {
        CleaningConfigBuilder::default()
    }

    /// Parse a configuration from JSON and validate it.
    ///
    /// Omitted fields are not allowed; every setting must be spelled out.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let config: CleaningConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        check_positive("zscore_threshold", self.zscore_threshold)?;
        check_positive("iqr_multiplier", self.iqr_multiplier)?;
        Ok(())
    }
}

fn check_positive(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidThreshold {
            field: field.to_string(),
            value,
        })
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be a finite number above 0.0)")]
    InvalidThreshold { field: String, value: f64 },
}

/// Builder for [`CleaningConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleaningConfigBuilder {
    correlation_method: Option<CorrelationMethod>,
    anomaly_method: Option<AnomalyMethod>,
    imputation_method: Option<ImputationMethod>,
    keep: Option<KeepStrategy>,
    zscore_threshold: Option<f64>,
    iqr_multiplier: Option<f64>,
}

impl CleaningConfigBuilder {
    pub fn correlation_method(mut self, method: CorrelationMethod) -> Self {
        self.correlation_method = Some(method);
        self
    }

    pub fn anomaly_method(mut self, method: AnomalyMethod) -> Self {
        self.anomaly_method = Some(method);
        self
    }

    pub fn imputation_method(mut self, method: ImputationMethod) -> Self {
        self.imputation_method = Some(method);
        self
    }

    pub fn keep(mut self, keep: KeepStrategy) -> Self {
        self.keep = Some(keep);
        self
    }

    /// Set the `|z|` cut-off for the z-score rule.
    pub fn zscore_threshold(mut self, threshold: f64) -> Self {
        self.zscore_threshold = Some(threshold);
        self
    }

    /// Set the multiplier applied to the IQR when building the fences.
    pub fn iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.iqr_multiplier = Some(multiplier);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleaningConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleaningConfig, ConfigValidationError> {
        let config = CleaningConfig {
            correlation_method: self.correlation_method.unwrap_or_default(),
            anomaly_method: self.anomaly_method.unwrap_or_default(),
            imputation_method: self.imputation_method.unwrap_or_default(),
            keep: self.keep.unwrap_or_default(),
            zscore_threshold: self.zscore_threshold.unwrap_or(ZSCORE_THRESHOLD),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(IQR_MULTIPLIER),
        };

        config.validate()?;
        Ok(config)
    }
}
