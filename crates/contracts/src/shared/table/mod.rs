use serde::{Deserialize, Serialize};

/// Value of a single table cell after loading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Numeric value (declared numeric columns only)
    Number(f64),
    /// Raw text value
    Text(String),
    /// Empty cell or a value that failed numeric coercion
    Null,
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

/// Tabular payload for bulk display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableData {
    /// Column headers in source order
    pub columns: Vec<String>,
    /// Row cells, aligned with `columns`
    pub rows: Vec<Vec<CellValue>>,
}
