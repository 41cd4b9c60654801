use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Date32Type, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::temporal_conversions::date32_to_datetime;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::clean::{clean, derive_location_fields};
use super::model::{ECONOMIC_BLOCK, Table, Value};
use crate::config::DashboardConfig;
use crate::error::LoadError;

/// Cell texts a dataframe reader treats as missing.
const NA_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load, clean and enrich an export dataset.
///
/// Steps: read the file, coerce the date column, drop incomplete and
/// excluded rows, then derive `State` / `City_State` from `City`.
pub fn load_dataset(path: &Path, config: &DashboardConfig) -> Result<Table, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let raw = read_table(path)?;
    if raw.column_index(ECONOMIC_BLOCK).is_none() {
        return Err(LoadError::MissingColumn(ECONOMIC_BLOCK.to_string()));
    }
    let raw = coerce_dates(&raw, &config.date_column);
    let cleaned = clean(&raw, &config.excluded_block);
    let table = derive_location_fields(&cleaned)?;

    log::info!(
        "Loaded {} rows ({} before cleaning) with columns {:?}",
        table.len(),
        raw.len(),
        table.columns()
    );
    Ok(table)
}

/// Read a table from a file without any cleaning.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "City": "...", "Year": 2021, ... }, ...]`
/// * `.parquet` – flat columns of strings, integers, floats, booleans, dates
pub fn read_table(path: &Path) -> Result<Table, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    parsed.map_err(|cause| LoadError::Parse {
        path: path.to_path_buf(),
        cause,
    })
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// Columns are typed as a whole: all integers → `Integer`, all numbers →
/// `Float`, all booleans → `Bool`, anything else → `String`.
fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut raw_rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        raw_rows.push(record);
    }

    let mut columns: Vec<Vec<Value>> = Vec::with_capacity(headers.len());
    for col_idx in 0..headers.len() {
        let cells: Vec<&str> = raw_rows
            .iter()
            .map(|r| r.get(col_idx).unwrap_or(""))
            .collect();
        columns.push(infer_column(&cells));
    }

    let rows = (0..raw_rows.len())
        .map(|row| columns.iter().map(|col| col[row].clone()).collect())
        .collect();

    Ok(Table::new(headers, rows))
}

fn is_na(s: &str) -> bool {
    NA_MARKERS.contains(&s)
}

fn infer_column(cells: &[&str]) -> Vec<Value> {
    let present = || cells.iter().filter(|s| !is_na(s));

    if present().all(|s| s.trim().parse::<i64>().is_ok()) {
        return cells
            .iter()
            .map(|s| match s.trim().parse::<i64>() {
                Ok(i) if !is_na(s) => Value::Integer(i),
                _ => Value::Null,
            })
            .collect();
    }
    if present().all(|s| s.trim().parse::<f64>().is_ok()) {
        return cells
            .iter()
            .map(|s| match s.trim().parse::<f64>() {
                Ok(f) if !is_na(s) => Value::Float(f),
                _ => Value::Null,
            })
            .collect();
    }
    if present().all(|s| matches!(*s, "true" | "false" | "True" | "False" | "TRUE" | "FALSE")) {
        return cells
            .iter()
            .map(|s| {
                if is_na(s) {
                    Value::Null
                } else {
                    Value::Bool(s.eq_ignore_ascii_case("true"))
                }
            })
            .collect();
    }
    cells
        .iter()
        .map(|s| {
            if is_na(s) {
                Value::Null
            } else {
                Value::String(s.to_string())
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`.
/// Columns appear in order of first sighting; a key absent from a record
/// reads as null.
fn read_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if seen.insert(key.clone()) {
                columns.push(key.clone());
            }
        }
    }

    let mut rows: Vec<Vec<Value>> = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(json_to_value).unwrap_or(Value::Null))
                .collect()
        })
        .collect();

    // A column mixing integers and floats is a float column.
    for col in 0..columns.len() {
        let has_float = rows.iter().any(|r| matches!(r[col], Value::Float(_)));
        if has_float {
            for row in rows.iter_mut() {
                if let Value::Integer(i) = row[col] {
                    row[col] = Value::Float(i as f64);
                }
            }
        }
    }

    Ok(Table::new(columns, rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .map(|col| extract_value(col, row))
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }

    Ok(Table::new(columns, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_value(col: &Arc<dyn Array>, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        DataType::Date32 => date32_to_datetime(col.as_primitive::<Date32Type>().value(row))
            .map(Value::Date)
            .unwrap_or(Value::Null),
        other => bail!("Unsupported parquet column type {other:?}"),
    };
    Ok(value)
}

// ---------------------------------------------------------------------------
// Date coercion
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Month-first before day-first, like a dataframe reader without `dayfirst`.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y", "%d-%m-%Y", "%Y%m%d", "%d %b %Y", "%b %d %Y",
];

/// Parse a date in any of the common layouts; `None` if nothing fits.
pub fn parse_date_lenient(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    // Year-month only, e.g. "2021-07".
    NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Replace the cells of `column` by parsed dates; unparseable cells become
/// null instead of failing the load.  Tables without the column pass through.
pub fn coerce_dates(table: &Table, column: &str) -> Table {
    let Some(idx) = table.column_index(column) else {
        return table.clone();
    };

    let mut unparsed = 0usize;
    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut row = row.clone();
            let cell = match &row[idx] {
                Value::Date(d) => Value::Date(*d),
                Value::Null => Value::Null,
                other => match parse_date_lenient(&other.to_string()) {
                    Some(d) => Value::Date(d),
                    None => {
                        unparsed += 1;
                        Value::Null
                    }
                },
            };
            row[idx] = cell;
            row
        })
        .collect();

    if unparsed > 0 {
        log::warn!("{unparsed} value(s) in '{column}' are not dates and were set to null");
    }
    Table::new(table.columns().to_vec(), rows)
}
