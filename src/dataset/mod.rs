//! Dataset ingestion (CSV/Parquet via Arrow)
//!
//! Rows arrive as Arrow record batches and are converted once into
//! [`EmailRecord`]s. Columns are looked up by name, so extra columns are
//! ignored and column order does not matter.
//!
//! Required columns: `Body`, `Sender`, `Spam`. Optional: `BodyLength`.
//! Whether `BodyLength` exists is a property of the schema, not of the
//! individual rows; the feature builder relies on that.

mod record;

pub use record::EmailRecord;

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, StringArray};
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde::Serialize;
use tracing::info;

use crate::{Error, Result};

/// Column holding the email body text
pub const BODY_COLUMN: &str = "Body";
/// Column holding the sender
pub const SENDER_COLUMN: &str = "Sender";
/// Column holding the spam label
pub const SPAM_COLUMN: &str = "Spam";
/// Optional column holding the body length
pub const BODY_LENGTH_COLUMN: &str = "BodyLength";

/// Rows shown in a dataset preview
pub const PREVIEW_ROWS: usize = 5;

/// The full email collection plus the schema-level `BodyLength` decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    records: Vec<EmailRecord>,
    has_body_length: bool,
}

impl Dataset {
    /// Create a dataset from already-parsed records.
    #[must_use]
    pub fn new(records: Vec<EmailRecord>, has_body_length: bool) -> Self {
        Self {
            records,
            has_body_length,
        }
    }

    /// Load a delimited file with a header row.
    ///
    /// Every column is read as text and converted afterwards, so labels such
    /// as `True`/`False` and `1`/`0` are both accepted.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the file cannot be opened, `Error::Arrow`
    /// if it cannot be parsed, and `Error::Schema` if required columns are
    /// missing or hold unusable values.
    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let open = || {
            File::open(path).map_err(|e| {
                Error::Storage(format!("Failed to open CSV file {}: {e}", path.display()))
            })
        };

        let (inferred, _) = Format::default()
            .with_header(true)
            .infer_schema(open()?, Some(1))?;

        // Header names only; values are converted column by column below
        let fields: Vec<Field> = inferred
            .fields()
            .iter()
            .map(|field| Field::new(field.name(), DataType::Utf8, true))
            .collect();
        let schema = Arc::new(Schema::new(fields));

        let reader = ReaderBuilder::new(schema.clone())
            .with_header(true)
            .build(open()?)?;

        let mut batches = Vec::new();
        for batch in reader {
            batches.push(batch?);
        }

        let dataset = Self::from_schema_and_batches(&schema, &batches)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            has_body_length = dataset.has_body_length,
            "loaded CSV dataset"
        );
        Ok(dataset)
    }

    /// Load a Parquet file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Storage` if the file cannot be read or parsed and
    /// `Error::Schema` for missing or unusable columns.
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::Storage(format!("Failed to open Parquet file: {e}"))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file).map_err(|e| {
            Error::Storage(format!("Failed to parse Parquet file: {e}"))
        })?;
        let schema = builder.schema().clone();

        let reader = builder.build().map_err(|e| {
            Error::Storage(format!("Failed to create Parquet reader: {e}"))
        })?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch.map_err(|e| {
                Error::Storage(format!("Failed to read record batch: {e}"))
            })?;
            batches.push(batch);
        }

        let dataset = Self::from_schema_and_batches(&schema, &batches)?;
        info!(
            path = %path.display(),
            rows = dataset.len(),
            has_body_length = dataset.has_body_length,
            "loaded Parquet dataset"
        );
        Ok(dataset)
    }

    /// Convert in-memory record batches. All batches must share a schema.
    ///
    /// # Errors
    ///
    /// Returns `Error::Schema` if `batches` is empty, schemas disagree, or
    /// required columns are missing.
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let first = batches
            .first()
            .ok_or_else(|| Error::Schema("no record batches to read".to_string()))?;
        let schema = first.schema();

        for batch in &batches[1..] {
            if batch.schema() != schema {
                return Err(Error::Schema(format!(
                    "Schema mismatch: expected {:?}, got {:?}",
                    schema,
                    batch.schema()
                )));
            }
        }

        Self::from_schema_and_batches(&schema, batches)
    }

    fn from_schema_and_batches(schema: &Schema, batches: &[RecordBatch]) -> Result<Self> {
        for required in [BODY_COLUMN, SENDER_COLUMN, SPAM_COLUMN] {
            if schema.field_with_name(required).is_err() {
                return Err(Error::Schema(format!("missing required column '{required}'")));
            }
        }
        let has_body_length = schema.field_with_name(BODY_LENGTH_COLUMN).is_ok();

        let mut records = Vec::with_capacity(batches.iter().map(RecordBatch::num_rows).sum());
        for batch in batches {
            let body = text_column(batch, BODY_COLUMN)?;
            let sender = text_column(batch, SENDER_COLUMN)?;
            let spam = text_column(batch, SPAM_COLUMN)?;
            let body_length = if has_body_length {
                Some(text_column(batch, BODY_LENGTH_COLUMN)?)
            } else {
                None
            };

            for row in 0..batch.num_rows() {
                let row_number = records.len() + 1;
                let label = cell(&spam, row)
                    .and_then(parse_label)
                    .ok_or_else(|| {
                        Error::Schema(format!(
                            "column '{SPAM_COLUMN}' row {row_number}: expected a boolean label, got {:?}",
                            cell(&spam, row)
                        ))
                    })?;

                let mut record = EmailRecord::new(
                    cell(&body, row).unwrap_or_default(),
                    cell(&sender, row).unwrap_or_default(),
                    label,
                );

                if let Some(lengths) = &body_length {
                    if let Some(raw) = cell(lengths, row) {
                        let length = parse_length(raw).ok_or_else(|| {
                            Error::Schema(format!(
                                "column '{BODY_LENGTH_COLUMN}' row {row_number}: expected an integer, got {raw:?}"
                            ))
                        })?;
                        record = record.with_body_length(length);
                    }
                }

                records.push(record);
            }
        }

        Ok(Self {
            records,
            has_body_length,
        })
    }

    /// Get all records in file order.
    #[must_use]
    pub fn records(&self) -> &[EmailRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the dataset holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the schema carries a `BodyLength` column.
    #[must_use]
    pub const fn has_body_length(&self) -> bool {
        self.has_body_length
    }

    /// Labels in row order.
    #[must_use]
    pub fn labels(&self) -> Vec<bool> {
        self.records.iter().map(EmailRecord::is_spam).collect()
    }

    /// Number of spam rows.
    #[must_use]
    pub fn spam_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_spam()).count()
    }

    /// The first [`PREVIEW_ROWS`] records.
    #[must_use]
    pub fn preview(&self) -> &[EmailRecord] {
        &self.records[..self.records.len().min(PREVIEW_ROWS)]
    }
}

/// Read a named column as text, whatever its Arrow type.
fn text_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| Error::Schema(format!("missing required column '{name}'")))?;

    let casted = arrow::compute::cast(column, &DataType::Utf8).map_err(|e| {
        Error::Schema(format!("column '{name}' cannot be read as text: {e}"))
    })?;

    casted
        .as_any()
        .downcast_ref::<StringArray>()
        .cloned()
        .ok_or_else(|| Error::Other(format!("Failed to downcast column '{name}' to StringArray")))
}

fn cell(array: &StringArray, row: usize) -> Option<&str> {
    if array.is_null(row) {
        None
    } else {
        Some(array.value(row))
    }
}

fn parse_label(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "1.0" => Some(true),
        "false" | "0" | "0.0" => Some(false),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn parse_length(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    // Float columns (e.g. pandas exports with NaN elsewhere) hold whole numbers
    let value = trimmed.parse::<f64>().ok()?;
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{BooleanArray, Int64Array};

    fn batch(with_length: bool) -> RecordBatch {
        let mut fields = vec![
            Field::new("Body", DataType::Utf8, true),
            Field::new("Sender", DataType::Utf8, true),
            Field::new("Spam", DataType::Boolean, false),
        ];
        let mut columns: Vec<arrow::array::ArrayRef> = vec![
            Arc::new(StringArray::from(vec![Some("win money now"), None, Some("lunch?")])),
            Arc::new(StringArray::from(vec!["a@x.com", "b@x.com", "a@x.com"])),
            Arc::new(BooleanArray::from(vec![true, false, false])),
        ];
        if with_length {
            fields.push(Field::new("BodyLength", DataType::Int64, true));
            columns.push(Arc::new(Int64Array::from(vec![Some(13), Some(0), None])));
        }
        RecordBatch::try_new(Arc::new(Schema::new(fields)), columns).unwrap()
    }

    #[test]
    fn test_from_batches_reads_records() {
        let dataset = Dataset::from_batches(&[batch(false)]).unwrap();
        assert_eq!(dataset.len(), 3);
        assert!(!dataset.has_body_length());
        assert_eq!(dataset.records()[0].body(), "win money now");
        assert_eq!(dataset.records()[1].body(), "");
        assert_eq!(dataset.labels(), vec![true, false, false]);
        assert_eq!(dataset.spam_count(), 1);
    }

    #[test]
    fn test_from_batches_body_length() {
        let dataset = Dataset::from_batches(&[batch(true)]).unwrap();
        assert!(dataset.has_body_length());
        assert_eq!(dataset.records()[0].body_length(), Some(13));
        assert_eq!(dataset.records()[2].body_length(), None);
    }

    #[test]
    fn test_missing_required_column() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("Body", DataType::Utf8, false),
            Field::new("Spam", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["hi"])),
                Arc::new(BooleanArray::from(vec![false])),
            ],
        )
        .unwrap();

        let err = Dataset::from_batches(&[batch]).unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(err.to_string().contains("Sender"));
    }

    #[test]
    fn test_no_batches() {
        assert!(matches!(Dataset::from_batches(&[]), Err(Error::Schema(_))));
    }

    #[test]
    fn test_parse_label_variants() {
        assert_eq!(parse_label("True"), Some(true));
        assert_eq!(parse_label(" false "), Some(false));
        assert_eq!(parse_label("1"), Some(true));
        assert_eq!(parse_label("0.0"), Some(false));
        assert_eq!(parse_label("maybe"), None);
    }

    #[test]
    fn test_parse_length_variants() {
        assert_eq!(parse_length("42"), Some(42));
        assert_eq!(parse_length("42.0"), Some(42));
        assert_eq!(parse_length("42.5"), None);
        assert_eq!(parse_length("NaN"), None);
    }

    #[test]
    fn test_preview_caps_rows() {
        let records = (0..8)
            .map(|i| EmailRecord::new(format!("body {i}"), "s", i % 2 == 0))
            .collect();
        let dataset = Dataset::new(records, false);
        assert_eq!(dataset.preview().len(), PREVIEW_ROWS);
        assert_eq!(dataset.preview()[0].body(), "body 0");
    }
}
