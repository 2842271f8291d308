//! Survey Sheet Module
//!
//! Collects typed survey rows into an ordered sheet and publishes the
//! rendered table through a [`TableStore`].

pub mod columns;
pub mod rows;

pub use columns::{answer_column, column_letter};
pub use rows::{FaultlessRow, WordOrderRow};

use tracing::info;

use crate::error::SurveyResult;
use crate::store::{Cell, Table, TableStore, WriteOptions, WriteOutcome};

/// A row type destined for one survey worksheet
pub trait SurveyRow {
    /// Column names, in cell order
    fn header() -> &'static [&'static str];

    /// Cells for the row at zero-based data index `index`
    fn cells(&self, index: usize) -> Vec<Cell>;
}

/// Ordered builder of survey rows
#[derive(Debug, Clone)]
pub struct SurveySheet<R: SurveyRow> {
    rows: Vec<R>,
}

impl<R: SurveyRow> Default for SurveySheet<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: SurveyRow> SurveySheet<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: R) -> &mut Self {
        self.rows.push(row);
        self
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render rows in order; formulas are derived from each row's position.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(R::header().iter().copied());
        for (index, row) in self.rows.iter().enumerate() {
            table.push_row(row.cells(index));
        }
        table
    }
}

impl<R: SurveyRow> FromIterator<R> for SurveySheet<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Writes rendered survey sheets to a store
pub struct SurveyPublisher<'a> {
    store: &'a dyn TableStore,
    options: WriteOptions,
}

impl<'a> SurveyPublisher<'a> {
    pub fn new(store: &'a dyn TableStore) -> Self {
        Self {
            store,
            options: WriteOptions::default(),
        }
    }

    pub fn with_options(mut self, options: WriteOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn publish<R: SurveyRow>(
        &self,
        worksheet: &str,
        sheet: &SurveySheet<R>,
    ) -> SurveyResult<WriteOutcome> {
        let table = sheet.to_table();
        let outcome = self.store.write(worksheet, &table, &self.options).await?;
        info!(
            "published {} survey rows to '{}' via {} ({:?})",
            table.len(),
            worksheet,
            self.store.name(),
            outcome
        );
        Ok(outcome)
    }
}
