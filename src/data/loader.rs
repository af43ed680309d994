use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, MovieRecord, MovieTable, FAN_RATING, RELEASE_YEAR};
use crate::error::LoadError;

/// Tokens read as missing values in text files.
const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>", "#N/A", "-NaN", "-nan",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the movie table and coerce `Release Year` / `Fan Rating` to numbers.
///
/// Non-numeric values in those columns become [`CellValue::Null`]; the row is
/// kept. A file without one of these columns loads fine and simply has
/// nothing to group or filter on.
pub fn load_movies(path: &Path) -> Result<MovieTable, LoadError> {
    let mut table = load_file(path)?;
    for column in [RELEASE_YEAR, FAN_RATING] {
        let downgraded = table.coerce_numeric(column);
        if downgraded > 0 {
            log::debug!("{downgraded} non-numeric value(s) in '{column}' treated as missing");
        }
    }
    Ok(table)
}

/// Load a flat table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one movie per line (recommended)
/// * `.json`    – `[{ "Title": ..., "Release Year": ..., ... }, ...]`
/// * `.parquet` – flat primitive columns
pub fn load_file(path: &Path) -> Result<MovieTable, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "csv" => parse_csv(open(path)?),
        "json" => {
            let mut text = String::new();
            open(path)?
                .read_to_string(&mut text)
                .map_err(|source| LoadError::FileAccess {
                    path: path.to_path_buf(),
                    source: Arc::new(source),
                })?;
            parse_json(&text)
        }
        "parquet" | "pq" => parse_parquet(open(path)?),
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };

    parsed.map_err(|e| LoadError::Parse {
        path: path.to_path_buf(),
        reason: format!("{e:#}"),
    })
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::FileAccess {
        path: path.to_path_buf(),
        source: Arc::new(source),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every following row one movie.
/// Cell types are guessed per value; see [`guess_cell_type`].
fn parse_csv<R: Read>(input: R) -> Result<MovieTable> {
    let mut reader = csv::Reader::from_reader(input);
    let columns: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if columns.is_empty() {
        bail!("CSV has no header row");
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let values = record.iter().map(guess_cell_type).collect();
        records.push(MovieRecord { values });
    }

    Ok(MovieTable::from_records(columns, records))
}

fn guess_cell_type(s: &str) -> CellValue {
    let trimmed = s.trim();
    if NA_TOKENS.contains(&trimmed) {
        return CellValue::Null;
    }
    if let Ok(i) = trimmed.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = trimmed.parse::<f64>() {
        if f.is_finite() {
            return CellValue::Float(f);
        }
    }
    match trimmed {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Title": "Heat", "Release Year": 1995, "Fan Rating": 8.3, "Age Rating": "R" },
///   ...
/// ]
/// ```
fn parse_json(text: &str) -> Result<MovieTable> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let records = rows
        .iter()
        .filter_map(|row| row.as_object())
        .map(|obj| MovieRecord {
            values: columns
                .iter()
                .map(|col| obj.get(col).map(json_to_cell).unwrap_or(CellValue::Null))
                .collect(),
        })
        .collect();

    Ok(MovieTable::from_records(columns, records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one movie per row.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nested columns are rendered as text.
fn parse_parquet(file: File) -> Result<MovieTable> {
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let columns: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let arrays = batch
            .columns()
            .iter()
            .map(widen_column)
            .collect::<Result<Vec<_>>>()?;
        for row in 0..batch.num_rows() {
            let values = arrays
                .iter()
                .map(|col| extract_cell_value(col, row))
                .collect();
            records.push(MovieRecord { values });
        }
    }

    Ok(MovieTable::from_records(columns, records))
}

/// Cast narrow numeric and dictionary-encoded text columns (pandas
/// `int16`, `float32`, `category`) to the few types read cell by cell.
fn widen_column(col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16 | DataType::Float32 => DataType::Float64,
        DataType::Utf8View => DataType::Utf8,
        DataType::Dictionary(_, value)
            if matches!(
                value.as_ref(),
                DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View
            ) =>
        {
            DataType::Utf8
        }
        _ => return Ok(Arc::clone(col)),
    };
    cast(col, &target).with_context(|| format!("casting {} to {target}", col.data_type()))
}

/// Extract a single cell from an Arrow column at a given row.
///
/// Types without a direct mapping are rendered as their display text.
fn extract_cell_value(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let value = match col.data_type() {
        DataType::Utf8 => col
            .as_string_opt::<i32>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::LargeUtf8 => col
            .as_string_opt::<i64>()
            .map(|s| CellValue::String(s.value(row).to_string())),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| CellValue::Integer(a.value(row))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| match a.value(row) {
                v if v.is_nan() => CellValue::Null,
                v => CellValue::Float(v),
            }),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|a| CellValue::Bool(a.value(row))),
        _ => None,
    };
    value.unwrap_or_else(|| match array_value_to_string(col.as_ref(), row) {
        Ok(text) => CellValue::String(text),
        Err(e) => {
            log::debug!("cannot render {} cell: {e}", col.data_type());
            CellValue::Null
        }
    })
}
