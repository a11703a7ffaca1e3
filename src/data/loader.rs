use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::DataLoadError;
use super::model::{is_missing, CreditDataset, RawRecord};

/// Columns every input must carry, in the order rows are assembled.
pub const EXPECTED_COLUMNS: [&str; 9] = [
    "Age",
    "Sex",
    "Job",
    "Housing",
    "Saving accounts",
    "Checking account",
    "Credit amount",
    "Duration",
    "Purpose",
];

/// One row's cells in [`EXPECTED_COLUMNS`] order; `None` is a missing cell.
type Cells = Vec<Option<String>>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a credit dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated with a header row
/// * `.tsv`          – tab-separated with a header row
/// * `.json`         – `[{ "Age": 67, "Sex": "male", ... }, ...]`
/// * `.parquet`      – one column per expected field
pub fn load_file(path: &Path) -> Result<CreditDataset, DataLoadError> {
    if !path.exists() {
        return Err(DataLoadError::NotFound(path.to_path_buf()));
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "csv" | "txt" => read_delimited(path, b',')?,
        "tsv" => read_delimited(path, b'\t')?,
        "json" => read_json(path)?,
        "parquet" | "pq" => read_parquet(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    let raw = rows
        .into_iter()
        .enumerate()
        .map(|(i, cells)| parse_row(i, cells))
        .collect::<Result<Vec<_>, _>>()?;

    let dataset = CreditDataset::from_raw(raw);
    log::info!(
        "Loaded {} records from {} (credit range {:?}, age range {:?})",
        dataset.len(),
        path.display(),
        dataset.credit_range(),
        dataset.age_range()
    );
    Ok(dataset)
}

/// Parse delimited text already in memory. Same rules as [`load_file`].
pub fn load_csv_reader<R: std::io::Read>(
    reader: R,
    delimiter: u8,
) -> Result<CreditDataset, DataLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    let rows = read_csv_rows(&mut csv_reader)?;
    let raw = rows
        .into_iter()
        .enumerate()
        .map(|(i, cells)| parse_row(i, cells))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CreditDataset::from_raw(raw))
}

// ---------------------------------------------------------------------------
// Row assembly
// ---------------------------------------------------------------------------

fn parse_row(row: usize, cells: Cells) -> Result<RawRecord, DataLoadError> {
    let mut it = cells.into_iter();
    let mut next = || it.next().flatten();

    let age = parse_int(row, "Age", next())?;
    let sex = required(row, "Sex", next())?;
    let job = required(row, "Job", next())?;
    let housing = required(row, "Housing", next())?;
    let saving_accounts = next();
    let checking_account = next();
    let credit_amount = parse_int(row, "Credit amount", next())?;
    let duration = parse_int(row, "Duration", next())?;
    let purpose = required(row, "Purpose", next())?;

    Ok(RawRecord {
        age,
        sex,
        job,
        housing,
        saving_accounts,
        checking_account,
        credit_amount,
        duration,
        purpose,
    })
}

fn required(row: usize, column: &'static str, cell: Option<String>) -> Result<String, DataLoadError> {
    match cell {
        Some(s) if !is_missing(&s) => Ok(s.trim().to_string()),
        _ => Err(DataLoadError::MalformedRow {
            row,
            column,
            reason: "value is missing".to_string(),
        }),
    }
}

/// Integers may arrive as `"67"` or `"67.0"` depending on the exporter.
fn parse_int(row: usize, column: &'static str, cell: Option<String>) -> Result<i64, DataLoadError> {
    let s = required(row, column, cell)?;
    if let Ok(i) = s.parse::<i64>() {
        return Ok(i);
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 => Ok(f as i64),
        _ => Err(DataLoadError::MalformedRow {
            row,
            column,
            reason: format!("'{s}' is not an integer"),
        }),
    }
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<Cells>, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(file);
    read_csv_rows(&mut reader)
}

fn read_csv_rows<R: std::io::Read>(reader: &mut csv::Reader<R>) -> Result<Vec<Cells>, DataLoadError> {
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error("reading header row", e))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let positions = EXPECTED_COLUMNS
        .iter()
        .map(|&col| {
            headers
                .iter()
                .position(|h| h == col)
                .ok_or(DataLoadError::MissingColumn(col))
        })
        .collect::<Result<Vec<usize>, _>>()?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(&format!("row {row_no}"), e))?;
        let cells = positions
            .iter()
            .map(|&idx| record.get(idx).filter(|v| !is_missing(v)).map(str::to_string))
            .collect();
        rows.push(cells);
    }
    Ok(rows)
}

fn csv_error(what: &str, e: csv::Error) -> DataLoadError {
    DataLoadError::Malformed {
        format: "CSV",
        reason: format!("{what}: {e}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Age": 67, "Sex": "male", "Job": 2, "Housing": "own",
///     "Saving accounts": null, "Checking account": "little",
///     "Credit amount": 1169, "Duration": 6, "Purpose": "radio/TV" },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<Vec<Cells>, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_json_rows(&text)
}

fn parse_json_rows(text: &str) -> Result<Vec<Cells>, DataLoadError> {
    let malformed = |reason: String| DataLoadError::Malformed {
        format: "JSON",
        reason,
    };

    let root: JsonValue = serde_json::from_str(text).map_err(|e| malformed(e.to_string()))?;
    let records = root
        .as_array()
        .ok_or_else(|| malformed("expected top-level JSON array".to_string()))?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .ok_or_else(|| malformed(format!("row {i} is not a JSON object")))?;

        let mut cells = Vec::with_capacity(EXPECTED_COLUMNS.len());
        for col in EXPECTED_COLUMNS {
            let value = obj.get(col).ok_or(DataLoadError::MissingColumn(col))?;
            cells.push(json_to_cell(value));
        }
        rows.push(cells);
    }
    Ok(rows)
}

fn json_to_cell(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per expected field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`); string, integer, float and boolean
/// columns are accepted and nulls become missing cells.
fn read_parquet(path: &Path) -> Result<Vec<Cells>, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| DataLoadError::Malformed {
        format: "Parquet",
        reason: format!("reading parquet metadata: {e}"),
    })?;

    let schema = builder.schema().clone();
    let col_indices = EXPECTED_COLUMNS
        .iter()
        .map(|&col| schema.index_of(col).map_err(|_| DataLoadError::MissingColumn(col)))
        .collect::<Result<Vec<usize>, _>>()?;

    collect_parquet_rows(builder, &col_indices).map_err(|e| DataLoadError::Malformed {
        format: "Parquet",
        reason: format!("{e:#}"),
    })
}

fn collect_parquet_rows(
    builder: ParquetRecordBatchReaderBuilder<std::fs::File>,
    col_indices: &[usize],
) -> anyhow::Result<Vec<Cells>> {
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = col_indices
                .iter()
                .map(|&idx| {
                    extract_cell(batch.column(idx), row)
                        .with_context(|| format!("row {}, column {idx}", rows.len()))
                })
                .collect::<anyhow::Result<Cells>>()?;
            rows.push(cells);
        }
    }
    Ok(rows)
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column as text.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let text = match col.data_type() {
        DataType::Utf8 => any
            .downcast_ref::<StringArray>()
            .context("expected StringArray")?
            .value(row)
            .to_string(),
        DataType::LargeUtf8 => any
            .downcast_ref::<LargeStringArray>()
            .context("expected LargeStringArray")?
            .value(row)
            .to_string(),
        DataType::Int32 => any
            .downcast_ref::<Int32Array>()
            .context("expected Int32Array")?
            .value(row)
            .to_string(),
        DataType::Int64 => any
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?
            .value(row)
            .to_string(),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .context("expected Float32Array")?
            .value(row)
            .to_string(),
        DataType::Float64 => any
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?
            .value(row)
            .to_string(),
        DataType::Boolean => any
            .downcast_ref::<BooleanArray>()
            .context("expected BooleanArray")?
            .value(row)
            .to_string(),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = ",Age,Sex,Job,Housing,Saving accounts,Checking account,Credit amount,Duration,Purpose\n";

    #[test]
    fn csv_rows_are_cleaned_and_bucketed() {
        let text = format!(
            "{HEADER}0,67,male,2,own,,little,1169,6,radio/TV\n1,22,female,2,own,little,moderate,5951,48,radio/TV\n"
        );
        let ds = load_csv_reader(text.as_bytes(), b',').unwrap();
        assert_eq!(ds.len(), 2);
        let first = &ds.records()[0];
        assert_eq!(first.saving_accounts, "unknown");
        assert_eq!(first.checking_account, "little");
        assert_eq!(first.age_bracket.map(|b| b.label()), Some("55+"));
        assert_eq!(first.credit_bucket.label(), "Very Low");
        assert_eq!(ds.records()[1].credit_bucket.label(), "Very High");
    }

    #[test]
    fn missing_column_fails_fast() {
        let text = "Age,Sex,Job,Housing,Saving accounts,Checking account,Credit amount,Purpose\n\
                    67,male,2,own,,little,1169,radio/TV\n";
        let err = load_csv_reader(text.as_bytes(), b',').unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn("Duration")));
    }

    #[test]
    fn float_formatted_integers_are_accepted() {
        let text = format!("{HEADER}0,30.0,male,1,rent,NA,NA,2000.0,12,car\n");
        let ds = load_csv_reader(text.as_bytes(), b',').unwrap();
        assert_eq!(ds.records()[0].age, 30);
        assert_eq!(ds.records()[0].credit_amount, 2000);
    }

    #[test]
    fn non_numeric_age_is_reported_with_row() {
        let text = format!("{HEADER}0,30,male,1,rent,,,2000,12,car\n1,old,male,1,rent,,,2000,12,car\n");
        let err = load_csv_reader(text.as_bytes(), b',').unwrap_err();
        match err {
            DataLoadError::MalformedRow { row, column, .. } => {
                assert_eq!(row, 1);
                assert_eq!(column, "Age");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn json_records_with_nulls() {
        let text = r#"[
            {"Age": 35, "Sex": "male", "Job": 3, "Housing": "free",
             "Saving accounts": null, "Checking account": null,
             "Credit amount": 6948, "Duration": 36, "Purpose": "car"}
        ]"#;
        let rows = parse_json_rows(text).unwrap();
        let record = parse_row(0, rows.into_iter().next().unwrap()).unwrap();
        assert_eq!(record.job, "3");
        assert_eq!(record.saving_accounts, None);
        assert_eq!(record.credit_amount, 6948);
    }

    #[test]
    fn json_missing_key_is_missing_column() {
        let text = r#"[{"Age": 35, "Sex": "male"}]"#;
        assert!(matches!(
            parse_json_rows(text),
            Err(DataLoadError::MissingColumn("Job"))
        ));
    }
}
