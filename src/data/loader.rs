use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use thiserror::Error;

use super::model::{ColumnKind, Record, Table};

/// The source does not carry the columns the record type needs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("missing columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row naming the columns (recommended)
/// * `.json`    – `[{ "Invoice ID": "...", "Total": 12.5, ... }, ...]`
/// * `.parquet` – one column per field
///
/// Every column of `R`'s schema must be present; extra columns are ignored.
/// Date columns are parsed permissively, see [`parse_date`].
pub fn load_file<R>(path: &Path) -> Result<Table<R>>
where
    R: Record + DeserializeOwned,
{
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} rows from {} with columns {:?}",
        records.len(),
        path.display(),
        R::column_names()
    );
    report_null_dates(&records);

    Ok(Table::new(records))
}

/// Check that every schema column of `R` is among `available`.
pub fn check_schema<'a, R: Record>(
    available: impl IntoIterator<Item = &'a str>,
) -> Result<(), SchemaError> {
    let available: BTreeSet<&str> = available.into_iter().collect();
    let missing: Vec<String> = R::columns()
        .iter()
        .filter(|c| !available.contains(c.name))
        .map(|c| c.name.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::MissingColumns { missing })
    }
}

fn report_null_dates<R: Record>(records: &[R]) {
    for column in R::columns().iter().filter(|c| c.kind == ColumnKind::Date) {
        let nulls = records
            .iter()
            .filter(|r| r.value(column.name).map_or(true, |v| v.is_null()))
            .count();
        if nulls > 0 {
            log::warn!("{nulls} rows have an invalid or empty '{}' date", column.name);
        }
    }
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d", "%d-%m-%Y", "%m-%d-%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%m/%d/%Y %H:%M"];

/// Parse a date leniently. Returns `None` when no known format matches.
///
/// Accepts `M/D/YYYY`, `YYYY-MM-DD`, `YYYY/MM/DD`, `DD-MM-YYYY`, `MM-DD-YYYY`,
/// common date-time layouts and RFC 3339 (the time part is dropped).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

/// Date of a Unix timestamp in milliseconds (pandas' default JSON date unit).
pub fn date_from_epoch_millis(millis: i64) -> Option<NaiveDate> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.date_naive())
}

/// Serde adapters for a nullable, leniently parsed date field.
///
/// Deserialization never fails on a bad date: it yields `None` instead.
/// Strings go through [`parse_date`](super::parse_date), numbers are epoch
/// milliseconds, anything else is null.
pub mod lenient_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value as JsonValue;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = JsonValue::deserialize(deserializer)?;
        Ok(match raw {
            JsonValue::String(s) => super::parse_date(&s),
            JsonValue::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|v| v.is_finite()).map(|v| v as i64))
                .and_then(super::date_from_epoch_millis),
            _ => None,
        })
    }

    /// Writes `M/D/YYYY`, the layout of the supermarket export.
    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format("%-m/%-d/%Y").to_string()),
            None => serializer.serialize_none(),
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
fn load_csv<R>(path: &Path) -> Result<Vec<R>>
where
    R: Record + DeserializeOwned,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;
    let headers = reader.headers().context("reading CSV headers")?.clone();
    check_schema::<R>(headers.iter()).context("checking CSV header")?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<R>().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`).
fn load_json<R>(path: &Path) -> Result<Vec<R>>
where
    R: Record + DeserializeOwned,
{
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading JSON file {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            let obj = row
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            check_schema::<R>(obj.keys().map(String::as_str))
                .with_context(|| format!("checking JSON row {i}"))?;
            serde_json::from_value::<R>(row.clone()).with_context(|| format!("JSON row {i}"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, one column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Each row goes through the same serde
/// path as JSON, so type rules are identical across formats.
fn load_parquet<R>(path: &Path) -> Result<Vec<R>>
where
    R: Record + DeserializeOwned,
{
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening parquet file {}", path.display()))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();
        check_schema::<R>(schema.fields().iter().map(|f| f.name().as_str()))
            .context("checking parquet schema")?;

        let columns: Vec<(&str, ColumnKind, ArrayRef)> = R::columns()
            .iter()
            .filter_map(|c| {
                let col = batch.column_by_name(c.name)?;
                let col = match c.kind {
                    ColumnKind::Date => normalize_date_column(c.name, col),
                    _ => Arc::clone(col),
                };
                Some((c.name, c.kind, col))
            })
            .collect();

        for row in 0..batch.num_rows() {
            let mut obj = Map::new();
            for (name, kind, col) in &columns {
                let value = match arrow_cell_to_json(col, row) {
                    Ok(value) => value,
                    // A date cell that cannot be read degrades to null.
                    Err(_) if *kind == ColumnKind::Date => JsonValue::Null,
                    Err(e) => {
                        return Err(e)
                            .with_context(|| format!("Row {}: column '{name}'", records.len()))
                    }
                };
                obj.insert(name.to_string(), value);
            }
            let record = serde_json::from_value::<R>(JsonValue::Object(obj))
                .with_context(|| format!("Row {}", records.len()))?;
            records.push(record);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Cast timestamp and `Date64` columns to `Date32` so their cells read as
/// ISO dates. Other layouts are left alone.
fn normalize_date_column(name: &str, col: &ArrayRef) -> ArrayRef {
    match col.data_type() {
        DataType::Timestamp(_, _) | DataType::Date64 => {
            match cast(col.as_ref(), &DataType::Date32) {
                Ok(dates) => dates,
                Err(e) => {
                    log::warn!("Cannot read column '{name}' as dates: {e}");
                    Arc::clone(col)
                }
            }
        }
        _ => Arc::clone(col),
    }
}

/// Convert a single Arrow cell to a JSON value.
fn arrow_cell_to_json(col: &ArrayRef, row: usize) -> Result<JsonValue> {
    if col.is_null(row) {
        return Ok(JsonValue::Null);
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Utf8 => {
            let arr = any.downcast_ref::<StringArray>().context("expected StringArray")?;
            JsonValue::from(arr.value(row))
        }
        DataType::LargeUtf8 => {
            let arr = any
                .downcast_ref::<LargeStringArray>()
                .context("expected LargeStringArray")?;
            JsonValue::from(arr.value(row))
        }
        DataType::Int32 => {
            let arr = any.downcast_ref::<Int32Array>().context("expected Int32Array")?;
            JsonValue::from(arr.value(row))
        }
        DataType::Int64 => {
            let arr = any.downcast_ref::<Int64Array>().context("expected Int64Array")?;
            JsonValue::from(arr.value(row))
        }
        DataType::Float32 => {
            let arr = any.downcast_ref::<Float32Array>().context("expected Float32Array")?;
            JsonValue::from(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = any.downcast_ref::<Float64Array>().context("expected Float64Array")?;
            JsonValue::from(arr.value(row))
        }
        DataType::Boolean => {
            let arr = any.downcast_ref::<BooleanArray>().context("expected BooleanArray")?;
            JsonValue::from(arr.value(row))
        }
        DataType::Date32 => {
            let arr = any.downcast_ref::<Date32Array>().context("expected Date32Array")?;
            // Date32 counts days since 1970-01-01 (day 719,163 of the common era).
            NaiveDate::from_num_days_from_ce_opt(arr.value(row) + 719_163)
                .map(|d| JsonValue::from(d.format("%Y-%m-%d").to_string()))
                .unwrap_or(JsonValue::Null)
        }
        other => bail!("Unsupported column type {other:?}"),
    };
    Ok(value)
}
