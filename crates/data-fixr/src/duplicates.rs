//! Duplicate-row detection and removal.
//!
//! Two rows are duplicates when they hold identical values across the key
//! columns (all columns by default). Missing cells compare equal to each
//! other, so rows with missing values in the same places can still be
//! duplicates. Kept rows retain their relative order.

use crate::config::KeepStrategy;
use crate::error::{FixrError, Result};
use crate::types::DuplicateSummary;
use polars::prelude::*;
use tracing::debug;

/// Remove duplicate rows from `df`.
///
/// `cols` restricts duplicate identification to a subset of columns; the
/// returned table still carries every column.
///
/// # Errors
///
/// - [`FixrError::Key`] listing every name in `cols` that is not a column of `df`.
/// - [`FixrError::Value`] if `cols` is an empty list.
pub fn remove_duplicates(
    df: &DataFrame,
    cols: Option<&[&str]>,
    keep: KeepStrategy,
) -> Result<DataFrame> {
    let (cleaned, _) = remove_duplicates_with_report(df, cols, keep)?;
    Ok(cleaned)
}

/// Remove duplicate rows and summarize what was removed.
///
/// See [`remove_duplicates`].
pub fn remove_duplicates_with_report(
    df: &DataFrame,
    cols: Option<&[&str]>,
    keep: KeepStrategy,
) -> Result<(DataFrame, DuplicateSummary)> {
    let subset = key_columns(df, cols)?;

    let cleaned = if df.height() == 0 || df.width() == 0 {
        df.clone()
    } else {
        df.unique_stable(subset.as_deref(), unique_strategy(keep), None)?
    };

    let total_rows = df.height();
    let rows_removed = total_rows - cleaned.height();
    debug!(
        "Removed {} duplicate rows of {} (keep={})",
        rows_removed, total_rows, keep
    );

    let summary = DuplicateSummary {
        total_rows,
        duplicate_rows: rows_removed,
        rows_removed,
        strategy: keep,
        cols_used: subset,
    };
    Ok((cleaned, summary))
}

fn unique_strategy(keep: KeepStrategy) -> UniqueKeepStrategy {
    match keep {
        KeepStrategy::First => UniqueKeepStrategy::First,
        KeepStrategy::Last => UniqueKeepStrategy::Last,
        KeepStrategy::None => UniqueKeepStrategy::None,
    }
}

/// Validated owned key names, or `None` for every column.
fn key_columns(df: &DataFrame, cols: Option<&[&str]>) -> Result<Option<Vec<String>>> {
    let Some(names) = cols else {
        return Ok(None);
    };
    if names.is_empty() {
        return Err(FixrError::Value(
            "cols must name at least one column".to_string(),
        ));
    }

    let missing: Vec<String> = names
        .iter()
        .filter(|name| df.column(name).is_err())
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(FixrError::Key { missing });
    }

    Ok(Some(names.iter().map(|name| name.to_string()).collect()))
}
