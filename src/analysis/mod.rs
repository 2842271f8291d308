//! Response Analysis Module
//!
//! Reads collected survey results, summarises them per experimental
//! condition and compares conditions with a rank-based test.

pub mod faultless;
pub mod stats;
pub mod word_order;

pub use faultless::FaultlessReport;
pub use stats::{describe, kruskal_wallis, Descriptives, Group, KruskalWallis};
pub use word_order::WordOrderReport;

use tracing::warn;

use crate::error::{SurveyError, SurveyResult};
use crate::store::{Cell, Table};

/// Spreadsheet error literals such as `#DIV/0!` or `#N/A`
pub(crate) fn is_sheet_error(cell: &Cell) -> bool {
    matches!(cell, Cell::Text(s) if s.trim_start().starts_with('#'))
}

/// Numeric values of one column; blanks and sheet errors are skipped.
pub fn numeric_column(table: &Table, column: &str) -> SurveyResult<Vec<f64>> {
    let index = table.require_column(column)?;
    let mut values = Vec::with_capacity(table.len());
    for record in table.records() {
        let Some(cell) = record.get(column) else { continue };
        if cell.is_empty() {
            continue;
        }
        if is_sheet_error(cell) {
            warn!("skipping '{}' in column '{}' row {}", cell, column, record.sheet_row());
            continue;
        }
        let value = cell.as_f64().ok_or_else(|| {
            SurveyError::Validation(format!(
                "column '{}' (#{}) row {}: '{}' is not a number",
                column,
                index + 1,
                record.sheet_row(),
                cell
            ))
        })?;
        values.push(value);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_column_skips_blanks_and_errors() {
        let mut table = Table::new(["n"]);
        table.push_row(vec![Cell::Number(2.0)]);
        table.push_row(vec![Cell::Empty]);
        table.push_row(vec![Cell::text("#DIV/0!")]);
        table.push_row(vec![Cell::text("4")]);
        assert_eq!(numeric_column(&table, "n").unwrap(), vec![2.0, 4.0]);

        table.push_row(vec![Cell::text("many")]);
        assert!(matches!(numeric_column(&table, "n"), Err(SurveyError::Validation(_))));
    }
}
