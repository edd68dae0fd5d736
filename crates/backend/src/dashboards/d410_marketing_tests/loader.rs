use chrono::{DateTime, NaiveDate, NaiveDateTime};
use contracts::shared::table::{CellValue, TableData};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use super::columns::{Metric, TextField, DATE, EXAMPLE, REQUIRED, TEST_TYPE};

/// Failure to produce a table. Fatal for the session.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} contains no data")]
    Empty { path: String },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: String, column: &'static str },

    #[error("malformed CSV in {path}: {message}")]
    Malformed { path: String, message: String },
}

/// A numeric cell that could not be parsed. The cell is stored as missing.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("row {row}: '{value}' in column '{column}' is not a number")]
pub struct CoercionWarning {
    /// 1-based data row (header excluded)
    pub row: usize,
    pub column: String,
    pub value: String,
}

/// One marketing test
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    example: String,
    test_type: String,
    metrics: [Option<f64>; 12],
    text: [Option<String>; 4],
    date: Option<NaiveDate>,
    cells: Vec<CellValue>,
}

impl Record {
    pub fn example(&self) -> &str {
        &self.example
    }

    pub fn test_type(&self) -> &str {
        &self.test_type
    }

    /// None when the cell is empty, malformed, or the column is absent
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics[metric.index()]
    }

    pub fn text(&self, field: TextField) -> Option<&str> {
        self.text[field.index()].as_deref()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    /// Cells aligned with the table columns
    pub fn cells(&self) -> &[CellValue] {
        &self.cells
    }
}

/// Immutable table of records in source order
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
    categories: Vec<String>,
    warnings: Vec<CoercionWarning>,
}

impl Table {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Distinct test types in order of first appearance
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn warnings(&self) -> &[CoercionWarning] {
        &self.warnings
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_table_data(&self) -> TableData {
        self.rows_data(&self.records)
    }

    /// Bulk display payload for a subset of this table's records
    pub fn rows_data<'a>(&self, records: impl IntoIterator<Item = &'a Record>) -> TableData {
        TableData {
            columns: self.columns.clone(),
            rows: records.into_iter().map(|r| r.cells.clone()).collect(),
        }
    }
}

/// Reads the source file once and hands out the cached table afterwards
#[derive(Debug)]
pub struct DataLoader {
    path: PathBuf,
    table: OnceCell<Arc<Table>>,
}

impl DataLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            table: OnceCell::new(),
        }
    }

    /// Load the table. A failed load is not cached and will be retried.
    pub fn load(&self) -> Result<Arc<Table>, LoadError> {
        self.table
            .get_or_try_init(|| read_table(&self.path).map(Arc::new))
            .map(Arc::clone)
    }
}

/// Read and parse a CSV file from disk
pub fn read_table(path: &Path) -> Result<Table, LoadError> {
    let source = path.display().to_string();
    tracing::info!("Loading marketing tests from {}", source);

    let text = std::fs::read_to_string(path).map_err(|e| LoadError::Io {
        path: source.clone(),
        source: e,
    })?;
    let table = parse_table(&text, &source)?;

    tracing::info!(
        "Loaded {} rows, {} columns, {} test types ({} coercion warnings)",
        table.len(),
        table.columns.len(),
        table.categories.len(),
        table.warnings.len()
    );
    Ok(table)
}

enum ColumnKind {
    Metric(Metric),
    Text,
}

/// Parse CSV text. `source` names the input in error messages.
pub fn parse_table(csv_text: &str, source: &str) -> Result<Table, LoadError> {
    let malformed = |e: csv::Error| LoadError::Malformed {
        path: source.to_string(),
        message: e.to_string(),
    };

    // Strip UTF-8 BOM if present
    let text = csv_text.trim_start_matches('\u{FEFF}');
    if text.trim().is_empty() {
        return Err(LoadError::Empty {
            path: source.to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(str::to_string)
        .collect();

    let position = |name: &str| columns.iter().position(|c| c == name);
    for column in REQUIRED {
        if position(column).is_none() {
            return Err(LoadError::MissingColumn {
                path: source.to_string(),
                column,
            });
        }
    }
    let example_idx = position(EXAMPLE).unwrap_or_default();
    let test_type_idx = position(TEST_TYPE).unwrap_or_default();
    let date_idx = position(DATE);
    let text_idx: Vec<(TextField, usize)> = TextField::ALL
        .iter()
        .filter_map(|f| position(f.column()).map(|i| (*f, i)))
        .collect();

    let kinds: Vec<ColumnKind> = columns
        .iter()
        .map(|c| match Metric::from_column(c) {
            Some(metric) => ColumnKind::Metric(metric),
            None => ColumnKind::Text,
        })
        .collect();

    let mut records = Vec::new();
    let mut categories: Vec<String> = Vec::new();
    let mut warnings = Vec::new();
    let mut seen_examples = HashSet::new();

    for (row_idx, result) in reader.records().enumerate() {
        let raw = result.map_err(malformed)?;
        let row = row_idx + 1;

        let mut metrics = [None; 12];
        let mut cells = Vec::with_capacity(columns.len());
        for (i, kind) in kinds.iter().enumerate() {
            let value = raw.get(i).unwrap_or("");
            let cell = match kind {
                ColumnKind::Metric(metric) => match coerce_number(value) {
                    Some(n) => {
                        metrics[metric.index()] = n;
                        n.map(CellValue::Number).unwrap_or(CellValue::Null)
                    }
                    None => {
                        let warning = CoercionWarning {
                            row,
                            column: columns[i].clone(),
                            value: value.to_string(),
                        };
                        tracing::warn!("{}", warning);
                        warnings.push(warning);
                        CellValue::Null
                    }
                },
                ColumnKind::Text => text_cell(value),
            };
            cells.push(cell);
        }

        let text_of = |idx: usize| cells[idx].as_text().map(str::to_string);
        let example = text_of(example_idx).unwrap_or_default();
        let test_type = text_of(test_type_idx).unwrap_or_default();

        let mut text: [Option<String>; 4] = Default::default();
        for (field, idx) in &text_idx {
            text[field.index()] = text_of(*idx);
        }

        let date = date_idx.and_then(|idx| cells[idx].as_text().and_then(parse_date));

        if !seen_examples.insert(example.clone()) {
            tracing::warn!("Duplicate example '{}' at row {}", example, row);
        }
        if !categories.contains(&test_type) {
            categories.push(test_type.clone());
        }

        records.push(Record {
            example,
            test_type,
            metrics,
            text,
            date,
            cells,
        });
    }

    if records.is_empty() {
        return Err(LoadError::Empty {
            path: source.to_string(),
        });
    }

    Ok(Table {
        columns,
        records,
        categories,
        warnings,
    })
}

/// `Some(None)` for an empty cell, `None` when the text is not a number
fn coerce_number(value: &str) -> Option<Option<f64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Some(None);
    }
    match trimmed.parse::<f64>() {
        Ok(n) if n.is_nan() => Some(None),
        Ok(n) if n.is_finite() => Some(Some(n)),
        // Infinities would poison sums and means
        _ => None,
    }
}

fn text_cell(value: &str) -> CellValue {
    if value.trim().is_empty() {
        CellValue::Null
    } else {
        CellValue::Text(value.to_string())
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
                .map(|dt| dt.date())
                .ok()
        })
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}
