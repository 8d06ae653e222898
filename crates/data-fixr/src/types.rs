use crate::config::KeepStrategy;
use polars::prelude::DataType;
use serde::{Deserialize, Serialize};

/// Kind of a table column, decided once from its dtype.
///
/// Integer and floating point columns are numeric. Every other dtype
/// (text, booleans, dates, categoricals) is treated as categorical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    pub fn of(dtype: &DataType) -> Self {
        if crate::utils::is_numeric_dtype(dtype) {
            ColumnKind::Numeric
        } else {
            ColumnKind::Categorical
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnKind::Numeric)
    }
}

/// One row of a long-format correlation report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub feature_1: String,
    pub feature_2: String,
    /// NaN when the coefficient is undefined (constant column, too few pairs).
    pub correlation: f64,
    pub abs_correlation: f64,
}

/// Summary of a duplicate-removal run.
///
/// # Example
///
/// ```rust,ignore
/// let (cleaned, summary) = remove_duplicates_with_report(&df, Some(&["id"]), KeepStrategy::Last)?;
/// println!("{} of {} rows removed", summary.rows_removed, summary.total_rows);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSummary {
    /// Number of rows in the input table.
    pub total_rows: usize,
    /// Number of rows marked as duplicates under the keep strategy.
    pub duplicate_rows: usize,
    /// Number of rows removed (always equal to `duplicate_rows`).
    pub rows_removed: usize,
    /// Keep strategy that was applied.
    pub strategy: KeepStrategy,
    /// Columns used to identify duplicates; `None` means all columns.
    pub cols_used: Option<Vec<String>>,
}

static_assertions::assert_impl_all!(ColumnKind: Send, Sync);
static_assertions::assert_impl_all!(CorrelationPair: Send, Sync);
static_assertions::assert_impl_all!(DuplicateSummary: Send, Sync);
