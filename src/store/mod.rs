//! Table Store Module
//!
//! A worksheet is exchanged with the outside world as a [`Table`]: a header
//! row of column names plus data rows. Every backend (Google Sheets, a
//! directory of JSON files, an in-process map) implements [`TableStore`].

pub mod json_dir;
pub mod memory;
pub mod sheets;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;
pub use sheets::SheetsStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{SurveyError, SurveyResult};

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Cell {
    Bool(bool),
    Number(f64),
    Text(String),
    #[default]
    Empty,
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Convert a JSON value as returned by a spreadsheet API.
    ///
    /// Numeric-looking strings become numbers, the same way spreadsheet
    /// clients numericise formatted values. Percent strings stay text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Empty,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Empty),
            Value::String(s) if s.is_empty() => Cell::Empty,
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.chars().any(|c| c.is_ascii_digit()) {
                    if let Ok(n) = trimmed.parse::<f64>() {
                        return Cell::Number(n);
                    }
                }
                Cell::Text(s.clone())
            }
            other => Cell::Text(other.to_string()),
        }
    }

    /// JSON payload for a spreadsheet write
    pub fn to_value(&self) -> Value {
        match self {
            Cell::Bool(b) => Value::Bool(*b),
            Cell::Number(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(String::new())),
            Cell::Text(s) => Value::String(s.clone()),
            Cell::Empty => Value::String(String::new()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the cell; a trailing `%` is stripped.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => s.trim().trim_end_matches('%').trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cell::Bool(b) => Some(*b),
            Cell::Text(s) if s.eq_ignore_ascii_case("true") => Some(true),
            Cell::Text(s) if s.eq_ignore_ascii_case("false") => Some(false),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Bool(true) => write!(f, "TRUE"),
            Cell::Bool(false) => write!(f, "FALSE"),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => write!(f, "{}", s),
            Cell::Empty => Ok(()),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Cell::Bool(b)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Header row plus data rows of a worksheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new<S: Into<String>>(header: impl IntoIterator<Item = S>) -> Self {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.header.len(), Cell::Empty);
        self.rows.push(row);
    }

    /// Build a table from raw API values; the first row is the header.
    pub fn from_values(values: &[Vec<Value>]) -> Self {
        let mut iter = values.iter();
        let header = match iter.next() {
            Some(row) => row
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.trim().to_string(),
                    other => Cell::from_value(other).to_string(),
                })
                .collect(),
            None => return Table::default(),
        };
        let mut table = Table { header, rows: Vec::new() };
        for row in iter {
            let cells: Vec<Cell> = row.iter().map(Cell::from_value).collect();
            if cells.iter().all(Cell::is_empty) {
                continue;
            }
            table.push_row(cells);
        }
        table
    }

    /// Header followed by rows, as an API `values` payload
    pub fn to_values(&self) -> Vec<Vec<Value>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        values.push(self.header.iter().map(|h| Value::String(h.clone())).collect());
        for row in &self.rows {
            values.push(row.iter().map(Cell::to_value).collect());
        }
        values
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.header.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// Index of a column that must exist
    pub fn require_column(&self, name: &str) -> SurveyResult<usize> {
        self.column_index(name).ok_or_else(|| {
            SurveyError::Validation(format!(
                "missing column '{}' (have: {})",
                name,
                self.header.join(", ")
            ))
        })
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().enumerate().map(move |(index, cells)| Record {
            table: self,
            index,
            cells,
        })
    }
}

/// Read-only view of one data row, addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    table: &'a Table,
    index: usize,
    cells: &'a [Cell],
}

impl<'a> Record<'a> {
    /// Zero-based data row index (the header is not counted)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Spreadsheet row number, counting the header as row 1
    pub fn sheet_row(&self) -> usize {
        self.index + 2
    }

    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.table.column_index(column).and_then(|i| self.cells.get(i))
    }

    /// Trimmed text of a column; missing and empty cells give `None`.
    pub fn text(&self, column: &str) -> Option<String> {
        self.get(column)
            .filter(|c| !c.is_empty())
            .map(|c| c.to_string().trim().to_string())
    }
}

/// Cosmetic formatting applied after a write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetFormat {
    pub frozen_rows: u32,
    pub frozen_columns: u32,
    pub bold_header: bool,
    /// First zero-based column whose data cells are centered
    pub centered_from_column: u32,
    /// Exclusive end of the centered data range
    pub centered_to_column: u32,
    /// Pixel width of column A
    pub first_column_width: u32,
}

impl Default for SheetFormat {
    fn default() -> Self {
        Self {
            frozen_rows: 1,
            frozen_columns: 1,
            bold_header: true,
            centered_from_column: 5,
            centered_to_column: 26,
            first_column_width: 25,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOptions {
    pub format: Option<SheetFormat>,
}

impl WriteOptions {
    pub fn formatted() -> Self {
        Self { format: Some(SheetFormat::default()) }
    }
}

/// What a write did to the target worksheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Created,
    Replaced,
}

/// Capability to read and write whole worksheets
///
/// Writes are create-or-update: an existing worksheet is cleared and
/// rewritten, otherwise a new one is created. No partial-write recovery
/// is attempted beyond what the backend itself guarantees.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &str;

    /// Read a worksheet; a missing worksheet is a `DataAccess` error.
    async fn read(&self, worksheet: &str) -> SurveyResult<Table>;

    async fn write(
        &self,
        worksheet: &str,
        table: &Table,
        options: &WriteOptions,
    ) -> SurveyResult<WriteOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_numericises_digits_only() {
        assert_eq!(Cell::from_value(&json!("12")), Cell::Number(12.0));
        assert_eq!(Cell::from_value(&json!("nan")), Cell::text("nan"));
        assert_eq!(Cell::from_value(&json!("57%")), Cell::text("57%"));
        assert_eq!(Cell::from_value(&json!("")), Cell::Empty);
    }

    #[test]
    fn test_percent_cell_as_f64() {
        assert_eq!(Cell::text("57.5%").as_f64(), Some(57.5));
        assert_eq!(Cell::Number(3.0).as_f64(), Some(3.0));
        assert_eq!(Cell::Empty.as_f64(), None);
    }

    #[test]
    fn test_table_from_values_pads_short_rows() {
        let values = vec![
            vec![json!("word"), json!("class"), json!("animate")],
            vec![json!("cat"), json!("noun")],
            vec![json!(""), json!("")],
        ];
        let table = Table::from_values(&values);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].len(), 3);

        let record = table.records().next().unwrap();
        assert_eq!(record.text("word").as_deref(), Some("cat"));
        assert_eq!(record.text("animate"), None);
        assert_eq!(record.sheet_row(), 2);
    }

    #[test]
    fn test_to_values_starts_with_header() {
        let mut table = Table::new(["a", "b"]);
        table.push_row(vec![Cell::Bool(true), Cell::Empty]);
        let values = table.to_values();
        assert_eq!(values[0], vec![json!("a"), json!("b")]);
        assert_eq!(values[1], vec![json!(true), json!("")]);
    }
}
