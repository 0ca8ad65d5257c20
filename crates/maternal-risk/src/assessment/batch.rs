use std::io::Read;
use std::path::Path;

use serde_json::Value;

use super::aggregator::Aggregator;
use super::domain::{AggregateReport, Condition};
use super::normalizer::{InputNormalizer, NormalizationError, RawAssessmentRequest};

/// Columns that identify the row rather than describe symptoms.
const SUBJECT_COLUMNS: [&str; 3] = ["subject", "user_id", "name"];

#[derive(Debug)]
pub enum BatchImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Normalization {
        row: usize,
        source: NormalizationError,
    },
}

impl std::fmt::Display for BatchImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchImportError::Io(err) => write!(f, "failed to read assessment batch: {}", err),
            BatchImportError::Csv(err) => write!(f, "invalid assessment CSV data: {}", err),
            BatchImportError::Normalization { row, source } => {
                write!(f, "row {} could not be normalized: {}", row, source)
            }
        }
    }
}

impl std::error::Error for BatchImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchImportError::Io(err) => Some(err),
            BatchImportError::Csv(err) => Some(err),
            BatchImportError::Normalization { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for BatchImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for BatchImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// One CSV row turned into a raw request. `row` is 1-based, excluding the header.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRecord {
    pub row: usize,
    pub subject: Option<String>,
    pub request: RawAssessmentRequest,
}

/// Scored counterpart of a [`BatchRecord`].
#[derive(Debug, Clone)]
pub struct BatchAssessment {
    pub row: usize,
    pub subject: Option<String>,
    pub report: AggregateReport,
}

/// Reads symptom tracker exports whose column names match raw request fields.
pub struct BatchImporter;

impl BatchImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<BatchRecord>, BatchImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<BatchRecord>, BatchImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut records = Vec::new();

        for (index, row) in csv_reader.records().enumerate() {
            let row = row?;
            let mut subject = None;
            let mut request = RawAssessmentRequest::new();

            for (header, cell) in headers.iter().zip(row.iter()) {
                if cell.is_empty() {
                    continue;
                }
                if SUBJECT_COLUMNS.contains(&header.to_ascii_lowercase().as_str()) {
                    subject.get_or_insert_with(|| cell.to_string());
                    continue;
                }
                request.insert(header, Value::String(cell.to_string()));
            }

            records.push(BatchRecord {
                row: index + 1,
                subject,
                request,
            });
        }

        Ok(records)
    }

    /// Normalize and score every record, stopping at the first row that
    /// cannot be normalized.
    pub fn assess(
        records: Vec<BatchRecord>,
        normalizer: &InputNormalizer,
        aggregator: &Aggregator,
        conditions: &[Condition],
    ) -> Result<Vec<BatchAssessment>, BatchImportError> {
        records
            .into_iter()
            .map(|record| {
                let inputs = normalizer
                    .normalize(&record.request)
                    .map_err(|source| BatchImportError::Normalization {
                        row: record.row,
                        source,
                    })?;
                Ok(BatchAssessment {
                    row: record.row,
                    subject: record.subject,
                    report: aggregator.run_all(conditions, &inputs),
                })
            })
            .collect()
    }
}
