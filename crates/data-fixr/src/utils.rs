//! Shared helpers for the cleaning transforms.
//!
//! Column-kind partitioning and the small set of order statistics the
//! transforms need on plain `f64` slices.

use crate::types::ColumnKind;
use polars::prelude::*;
use std::cmp::Ordering;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Split the columns of a table into numeric and categorical, keeping their
/// left-to-right order.
pub fn partition_columns(df: &DataFrame) -> (Vec<&Column>, Vec<&Column>) {
    df.get_columns()
        .iter()
        .partition(|col| ColumnKind::of(col.dtype()).is_numeric())
}

/// Read a numeric column as `f64` values, with `None` for missing cells.
pub fn numeric_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    let float_series = column.as_materialized_series().cast(&DataType::Float64)?;
    Ok(float_series.f64()?.into_iter().collect())
}

// =============================================================================
// Statistics Utilities
// =============================================================================

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = mean(values)?;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    Some(variance.sqrt())
}

/// Sort a copy of `values` ascending.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of an ascending slice, linearly interpolated between the two
/// closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// 1-based ranks with ties assigned the average of the ranks they span.
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut ranks = vec![f64::NAN; values.len()];
    let mut i = 0;
    while i < indexed.len() {
        let mut j = i;
        while j < indexed.len() && indexed[j].1 == indexed[i].1 {
            j += 1;
        }
        let rank = (i + j + 1) as f64 / 2.0;
        for &(idx, _) in &indexed[i..j] {
            ranks[idx] = rank;
        }
        i = j;
    }
    ranks
}

/// Most frequent value of an ascending slice.
///
/// Ties go to the value that sorts first.
pub fn mode_of_sorted<T: PartialEq + Clone>(sorted: &[T]) -> Option<T> {
    let mut best: Option<(&T, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j < sorted.len() && sorted[j] == sorted[i] {
            j += 1;
        }
        let count = j - i;
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((&sorted[i], count));
        }
        i = j;
    }
    best.map(|(value, _)| value.clone())
}
