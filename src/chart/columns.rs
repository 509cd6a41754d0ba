//! Column access over polars DataFrames
//!
//! Every value handed to a trace goes through here, so dates and times are
//! formatted the same way everywhere.

use crate::{PlotlinksError, Result};
use polars::prelude::*;
use serde_json::{json, Value};

fn series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|_| PlotlinksError::ColumnNotFound(name.to_string()))
}

/// Whether a column holds numbers.
pub fn is_numeric(dtype: &DataType) -> bool {
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

/// Names of all numeric columns, in frame order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .map(|c| c.name().to_string())
        .collect()
}

/// Fail with [`PlotlinksError::ColumnNotFound`] unless every name exists.
pub fn require<S: AsRef<str>>(df: &DataFrame, names: &[S]) -> Result<()> {
    for name in names {
        series(df, name.as_ref())?;
    }
    Ok(())
}

/// A numeric column as `f64`, nulls kept as `None`.
pub fn numbers(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let s = series(df, name)?;
    if !is_numeric(s.dtype()) {
        return Err(PlotlinksError::DataError(format!(
            "column '{}' is not numeric ({})",
            name,
            s.dtype()
        )));
    }
    let cast = s.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().collect())
}

/// Display text of every value in a column; nulls become empty strings.
pub fn labels(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    Ok(values(df, name)?
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        })
        .collect())
}

/// A column as JSON values: numbers, strings and booleans as themselves,
/// dates as `YYYY-MM-DD`, datetimes as `YYYY-MM-DD HH:MM:SS`.
pub fn values(df: &DataFrame, name: &str) -> Result<Vec<Value>> {
    let s = series(df, name)?;
    series_values(s)
}

fn series_values(s: &Series) -> Result<Vec<Value>> {
    let dtype = s.dtype().clone();
    match dtype {
        d if is_numeric(&d) => {
            let cast = s.cast(&DataType::Float64)?;
            let integral = !matches!(d, DataType::Float32 | DataType::Float64);
            Ok(cast
                .f64()?
                .into_iter()
                .map(|v| match v {
                    Some(v) if integral => json!(v as i64),
                    Some(v) if v.is_finite() => json!(v),
                    _ => Value::Null,
                })
                .collect())
        }
        DataType::Boolean => Ok(s.bool()?.into_iter().map(|v| json!(v)).collect()),
        DataType::String => Ok(s.str()?.into_iter().map(|v| json!(v)).collect()),
        DataType::Date => {
            let days = s.cast(&DataType::Int32)?;
            Ok(days
                .i32()?
                .into_iter()
                .map(|d| d.and_then(format_date).map(Value::String).unwrap_or(Value::Null))
                .collect())
        }
        DataType::Datetime(unit, _) => {
            let stamps = s.cast(&DataType::Int64)?;
            Ok(stamps
                .i64()?
                .into_iter()
                .map(|t| {
                    t.and_then(|t| format_datetime(t, unit))
                        .map(Value::String)
                        .unwrap_or(Value::Null)
                })
                .collect())
        }
        _ => {
            let text = s.cast(&DataType::String)?;
            Ok(text.str()?.into_iter().map(|v| json!(v)).collect())
        }
    }
}

/// Days since the Unix epoch as an ISO date.
pub fn format_date(days: i32) -> Option<String> {
    let epoch = chrono::NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let date = epoch.checked_add_signed(chrono::Duration::days(days as i64))?;
    Some(date.format("%Y-%m-%d").to_string())
}

fn format_datetime(stamp: i64, unit: TimeUnit) -> Option<String> {
    let micros = match unit {
        TimeUnit::Nanoseconds => stamp / 1_000,
        TimeUnit::Microseconds => stamp,
        TimeUnit::Milliseconds => stamp.checked_mul(1_000)?,
    };
    let dt = chrono::DateTime::from_timestamp_micros(micros)?;
    Some(dt.naive_utc().format("%Y-%m-%d %H:%M:%S").to_string())
}

/// Whether a column holds dates or datetimes.
pub fn is_temporal(df: &DataFrame, name: &str) -> Result<bool> {
    Ok(matches!(
        series(df, name)?.dtype(),
        DataType::Date | DataType::Datetime(_, _)
    ))
}

/// Values to use on the x axis: the named column, or row positions.
pub fn x_values(df: &DataFrame, x: Option<&str>) -> Result<Vec<Value>> {
    match x {
        Some(name) => values(df, name),
        None => Ok((0..df.height()).map(|i| json!(i)).collect()),
    }
}

/// Numbers as JSON, missing values as `null`.
pub fn to_json(values: &[Option<f64>]) -> Value {
    Value::Array(
        values
            .iter()
            .map(|v| match v {
                Some(v) if v.is_finite() => json!(v),
                _ => Value::Null,
            })
            .collect(),
    )
}
