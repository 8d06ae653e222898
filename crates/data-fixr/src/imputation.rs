//! Missing-value imputation.
//!
//! Numeric columns are filled with their mean, median or mode. Categorical
//! columns are always filled with their mode. Columns with no present value
//! are left untouched. The caller's table is never modified; imputation works
//! on a clone.

use crate::config::ImputationMethod;
use crate::error::{FixrError, Result, ResultExt};
use crate::types::ColumnKind;
use crate::utils::mode_of_sorted;
use polars::prelude::*;
use tracing::{debug, warn};

/// Fill missing values in every column of `df`.
///
/// Returns the filled copy and the percentage of cells that were filled,
/// relative to every cell of the table. An empty table is returned as-is
/// with `0.0`.
pub fn missing_values(df: &DataFrame, method: ImputationMethod) -> Result<(DataFrame, f64)> {
    let mut result = df.clone();
    let total_cells = df.height() * df.width();
    if total_cells == 0 {
        debug!("Empty DataFrame, nothing to impute");
        return Ok((result, 0.0));
    }

    let mut filled_cells = 0usize;
    for col in df.get_columns() {
        let series = col.as_materialized_series();
        let null_count = series.null_count();
        if null_count == 0 {
            continue;
        }
        if null_count == series.len() {
            warn!("Column '{}' has no values, leaving it unchanged", col.name());
            continue;
        }

        let filled = match ColumnKind::of(series.dtype()) {
            ColumnKind::Numeric => StatisticalImputer::fill_numeric(series, method),
            ColumnKind::Categorical => StatisticalImputer::fill_mode(series),
        }
        .context(format!("Imputing column '{}'", col.name()))?;

        if let Some(filled) = filled {
            let filled_here = null_count.checked_sub(filled.null_count()).ok_or_else(|| {
                FixrError::Value(format!(
                    "Imputing column '{}' produced more missing values than it had",
                    col.name()
                ))
            })?;
            debug!("Filled {} missing values in '{}'", filled_here, col.name());
            filled_cells += filled_here;
            result.replace(col.name().as_str(), filled)?;
        }
    }

    let filled_percentage = filled_cells as f64 / total_cells as f64 * 100.0;
    debug!(
        "Imputation ({}) filled {} of {} cells ({:.2}%)",
        method, filled_cells, total_cells, filled_percentage
    );
    Ok((result, filled_percentage))
}

/// Per-column fill rules.
///
/// Each function returns the filled series, or `None` when the column has no
/// value to derive a fill from.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill a numeric series with the statistic selected by `method`.
    ///
    /// Mean and median fills produce a Float64 series. A mode fill keeps the
    /// original dtype.
    pub fn fill_numeric(series: &Series, method: ImputationMethod) -> Result<Option<Series>> {
        let fill_value = match method {
            ImputationMethod::Mean => series.mean(),
            ImputationMethod::Median => series.median(),
            ImputationMethod::Mode if series.dtype().is_integer() => {
                return Self::fill_integer_mode(series);
            }
            ImputationMethod::Mode => Self::float_mode(series)?,
        };
        let Some(fill_value) = fill_value else {
            return Ok(None);
        };

        let floats = series.cast(&DataType::Float64)?;
        let filled: Float64Chunked = floats
            .f64()?
            .into_iter()
            .map(|v| Some(v.unwrap_or(fill_value)))
            .collect();
        let filled = filled.with_name(series.name().clone()).into_series();

        match method {
            ImputationMethod::Mode => Ok(Some(filled.cast(series.dtype())?)),
            _ => Ok(Some(filled)),
        }
    }

    /// Fill a series of any dtype with its most frequent value.
    ///
    /// Temporal columns are filled on their integer physical values, so the
    /// fill is exact. Categoricals, enums and decimals go through their text
    /// form. Dtypes with no usable ordering (binary, nested) are left alone.
    pub fn fill_mode(series: &Series) -> Result<Option<Series>> {
        if ColumnKind::of(series.dtype()).is_numeric() {
            return Self::fill_numeric(series, ImputationMethod::Mode);
        }

        match series.dtype() {
            DataType::String => Self::fill_string_mode(series),
            DataType::Boolean => {
                let ca = series.bool()?;
                let mut values: Vec<bool> = ca.into_iter().flatten().collect();
                values.sort_unstable();
                let Some(mode) = mode_of_sorted(&values) else {
                    return Ok(None);
                };
                let filled: BooleanChunked =
                    ca.into_iter().map(|v| Some(v.unwrap_or(mode))).collect();
                Ok(Some(filled.with_name(series.name().clone()).into_series()))
            }
            dtype if dtype.is_temporal() => {
                let physical = series.to_physical_repr();
                match Self::fill_integer_mode(&physical)? {
                    Some(filled) => Ok(Some(filled.cast(dtype)?)),
                    None => Ok(None),
                }
            }
            dtype @ (DataType::Categorical(_, _)
            | DataType::Enum(_, _)
            | DataType::Decimal(_, _)) => {
                let as_text = series.cast(&DataType::String)?;
                let Some(filled) = Self::fill_string_mode(&as_text)? else {
                    return Ok(None);
                };
                let filled = filled.cast(dtype)?;
                if filled.null_count() > 0 {
                    return Err(FixrError::Value(format!(
                        "Column '{}' of type {} did not survive a text round trip",
                        series.name(),
                        dtype
                    )));
                }
                Ok(Some(filled))
            }
            dtype => {
                warn!(
                    "No mode fill for column '{}' of type {}, leaving it unchanged",
                    series.name(),
                    dtype
                );
                Ok(None)
            }
        }
    }

    fn fill_string_mode(series: &Series) -> Result<Option<Series>> {
        let ca = series.str()?;
        let mut values: Vec<&str> = ca.into_iter().flatten().collect();
        values.sort_unstable();
        let Some(mode) = mode_of_sorted(&values) else {
            return Ok(None);
        };
        let filled: StringChunked = ca.into_iter().map(|v| Some(v.unwrap_or(mode))).collect();
        Ok(Some(filled.with_name(series.name().clone()).into_series()))
    }

    /// Mode fill on integer values, widened losslessly to 64 bits and cast
    /// back to the input dtype.
    fn fill_integer_mode(series: &Series) -> Result<Option<Series>> {
        let filled = if series.dtype().is_unsigned_integer() {
            let wide = series.cast(&DataType::UInt64)?;
            mode_filled(wide.u64()?)
        } else {
            let wide = series.cast(&DataType::Int64)?;
            mode_filled(wide.i64()?)
        };
        match filled {
            Some(filled) => Ok(Some(filled.cast(series.dtype())?)),
            None => Ok(None),
        }
    }

    fn float_mode(series: &Series) -> Result<Option<f64>> {
        let floats = series.cast(&DataType::Float64)?;
        let mut values: Vec<f64> = floats.f64()?.into_iter().flatten().collect();
        values.sort_by(f64::total_cmp);
        Ok(mode_of_sorted(&values))
    }
}

fn mode_filled<T>(ca: &ChunkedArray<T>) -> Option<Series>
where
    T: PolarsNumericType,
    T::Native: Ord,
    ChunkedArray<T>: IntoSeries,
{
    let mut values: Vec<T::Native> = ca.into_iter().flatten().collect();
    values.sort_unstable();
    let mode = mode_of_sorted(&values)?;
    let filled: ChunkedArray<T> = ca.into_iter().map(|v| Some(v.unwrap_or(mode))).collect();
    Some(filled.with_name(ca.name().clone()).into_series())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f64_at(df: &DataFrame, name: &str, idx: usize) -> f64 {
        df.column(name).unwrap().get(idx).unwrap().try_extract::<f64>().unwrap()
    }

    fn str_at(df: &DataFrame, name: &str, idx: usize) -> String {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .get(idx)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_median_numeric_and_mode_categorical() {
        let df = df![
            "age" => [Some(25), Some(30), None, Some(28)],
            "income" => [Some(50000), None, Some(52000), None],
            "city" => [Some("A"), Some("B"), None, Some("B")],
        ]
        .unwrap();

        let (result, pct) = missing_values(&df, ImputationMethod::Median).unwrap();

        assert_eq!(f64_at(&result, "age", 2), 28.0);
        assert_eq!(f64_at(&result, "income", 1), 51000.0);
        assert_eq!(f64_at(&result, "income", 3), 51000.0);
        assert_eq!(str_at(&result, "city", 2), "B");
        assert!((pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_mean_imputation() {
        let df = df![
            "a" => [Some(1.0), Some(2.0), None],
            "b" => [Some(10.0), None, Some(30.0)],
        ]
        .unwrap();

        let (result, pct) = missing_values(&df, ImputationMethod::Mean).unwrap();
        assert_eq!(f64_at(&result, "a", 2), 1.5);
        assert_eq!(f64_at(&result, "b", 1), 20.0);
        assert!((pct - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_numeric_mode_keeps_dtype() {
        let df = df!["a" => [Some(1i64), Some(2), Some(2), None, Some(2), Some(3)]].unwrap();

        let (result, pct) = missing_values(&df, ImputationMethod::Mode).unwrap();
        let a = result.column("a").unwrap();
        assert_eq!(a.dtype(), &DataType::Int64);
        assert_eq!(f64_at(&result, "a", 3), 2.0);
        assert!((pct - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_mode_tie_goes_to_smallest_value() {
        let df = df!["a" => [Some(2.0), Some(1.0), None, None]].unwrap();

        let (result, _) = missing_values(&df, ImputationMethod::Mode).unwrap();
        assert_eq!(f64_at(&result, "a", 2), 1.0);
        assert_eq!(f64_at(&result, "a", 3), 1.0);
    }

    #[test]
    fn test_categorical_uses_mode_regardless_of_method() {
        let df = df![
            "city" => [Some("A"), Some("B"), None, Some("B")],
            "country" => [Some("CA"), None, Some("CA"), Some("CA")],
        ]
        .unwrap();

        let (result, pct) = missing_values(&df, ImputationMethod::Mean).unwrap();
        assert_eq!(str_at(&result, "city", 2), "B");
        assert_eq!(str_at(&result, "country", 1), "CA");
        assert_eq!(pct, 25.0);
    }

    #[test]
    fn test_boolean_column_filled_with_mode() {
        let df = df!["flag" => [Some(true), None, Some(true), Some(false)]].unwrap();

        let (result, _) = missing_values(&df, ImputationMethod::Median).unwrap();
        let flag = result.column("flag").unwrap().as_materialized_series();
        assert_eq!(flag.dtype(), &DataType::Boolean);
        assert_eq!(flag.bool().unwrap().get(1), Some(true));
    }

    #[test]
    fn test_original_not_modified() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0)],
            "b" => [Some("x"), None, Some("z")],
        ]
        .unwrap();
        let original = df.clone();

        let (result, _) = missing_values(&df, ImputationMethod::Mean).unwrap();
        assert!(df.equals_missing(&original));
        assert!(!result.equals_missing(&df));
    }

    #[test]
    fn test_all_missing_column_unchanged() {
        let df = df![
            "a" => [Some(1.0), None, Some(3.0)],
            "b" => [Option::<f64>::None, None, None],
        ]
        .unwrap();

        let (result, pct) = missing_values(&df, ImputationMethod::Mean).unwrap();
        assert_eq!(result.column("b").unwrap().null_count(), 3);
        assert!((pct - 100.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_missing_values_is_unchanged() {
        let df = df![
            "a" => [1, 2, 3],
            "b" => ["x", "y", "z"],
        ]
        .unwrap();

        let (result, pct) = missing_values(&df, ImputationMethod::Mean).unwrap();
        assert!(result.equals_missing(&df));
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_empty_dataframe() {
        let (result, pct) = missing_values(&DataFrame::empty(), ImputationMethod::Mean).unwrap();
        assert_eq!(result.width(), 0);
        assert_eq!(pct, 0.0);
    }

    #[test]
    fn test_fill_numeric_all_missing_returns_none() {
        let series = Series::new("v".into(), &[Option::<f64>::None, None]);
        let filled = StatisticalImputer::fill_numeric(&series, ImputationMethod::Median).unwrap();
        assert!(filled.is_none());
    }

    fn physical_values(series: &Series) -> Vec<Option<i64>> {
        series
            .to_physical_repr()
            .cast(&DataType::Int64)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect()
    }

    fn temporal(values: &[Option<i64>], dtype: DataType) -> Series {
        Series::new("t".into(), values).cast(&dtype).unwrap()
    }

    #[test]
    fn test_temporal_columns_filled_on_physical_values() {
        let dtypes = [
            DataType::Date,
            DataType::Datetime(TimeUnit::Microseconds, None),
            DataType::Time,
            DataType::Duration(TimeUnit::Milliseconds),
        ];
        for dtype in dtypes {
            let series = temporal(&[Some(1), None, Some(1), Some(2)], dtype.clone());

            let filled = StatisticalImputer::fill_mode(&series).unwrap().unwrap();
            assert_eq!(filled.dtype(), &dtype);
            assert_eq!(filled.null_count(), 0);
            assert_eq!(
                physical_values(&filled),
                vec![Some(1), Some(1), Some(1), Some(2)]
            );
        }
    }

    #[test]
    fn test_datetime_frame_percentage() {
        let stamps = temporal(
            &[Some(1_700_000_000_000_000), None, Some(1_700_000_000_000_000), Some(5)],
            DataType::Datetime(TimeUnit::Microseconds, None),
        );
        let df = DataFrame::new(vec![stamps.into_column()]).unwrap();

        let (result, pct) = missing_values(&df, ImputationMethod::Mean).unwrap();
        let t = result.column("t").unwrap().as_materialized_series();
        assert_eq!(t.null_count(), 0);
        assert_eq!(physical_values(t)[1], Some(1_700_000_000_000_000));
        assert_eq!(pct, 25.0);
    }

    #[test]
    fn test_categorical_dtype_filled_with_mode() {
        let series = Series::new("c".into(), &[Some("a"), None, Some("b"), Some("b")])
            .cast(&DataType::from_categories(Categories::global()))
            .unwrap();

        let filled = StatisticalImputer::fill_mode(&series).unwrap().unwrap();
        assert!(filled.dtype().is_categorical());
        let text = filled.cast(&DataType::String).unwrap();
        assert_eq!(text.str().unwrap().get(1), Some("b"));
    }

    #[test]
    fn test_integer_mode_is_exact_above_float_precision() {
        let big = (1i64 << 53) + 1;
        let series = Series::new("a".into(), &[Some(big), None, Some(big), Some(3)]);

        let filled = StatisticalImputer::fill_mode(&series).unwrap().unwrap();
        assert_eq!(filled.dtype(), &DataType::Int64);
        assert_eq!(filled.i64().unwrap().get(1), Some(big));
    }

    #[test]
    fn test_unsigned_mode_is_exact() {
        let big = u64::MAX - 1;
        let series = Series::new("a".into(), &[Some(big), None, Some(big), Some(0u64)]);

        let filled = StatisticalImputer::fill_numeric(&series, ImputationMethod::Mode)
            .unwrap()
            .unwrap();
        assert_eq!(filled.dtype(), &DataType::UInt64);
        assert_eq!(filled.u64().unwrap().get(1), Some(big));
    }
}
