//! In-process table store, used by tests and dry runs.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

use super::{Table, TableStore, WriteOptions, WriteOutcome};
use crate::error::{SurveyError, SurveyResult};

#[derive(Default)]
pub struct MemoryStore {
    sheets: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a worksheet directly, bypassing write semantics
    pub async fn insert(&self, worksheet: impl Into<String>, table: Table) {
        self.sheets.write().await.insert(worksheet.into(), table);
    }

    pub async fn worksheet_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.sheets.read().await.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self, worksheet: &str) -> SurveyResult<Table> {
        self.sheets
            .read()
            .await
            .get(worksheet)
            .cloned()
            .ok_or_else(|| SurveyError::DataAccess(format!("worksheet '{}' not found", worksheet)))
    }

    async fn write(
        &self,
        worksheet: &str,
        table: &Table,
        _options: &WriteOptions,
    ) -> SurveyResult<WriteOutcome> {
        let mut sheets = self.sheets.write().await;
        let outcome = match sheets.insert(worksheet.to_string(), table.clone()) {
            Some(_) => WriteOutcome::Replaced,
            None => WriteOutcome::Created,
        };
        debug!("memory store wrote '{}' ({:?}, {} rows)", worksheet, outcome, table.len());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Cell;

    #[tokio::test]
    async fn test_create_then_replace() {
        let store = MemoryStore::new();
        let mut table = Table::new(["word"]);
        table.push_row(vec![Cell::text("cat")]);

        let first = store.write("Sheet1", &table, &WriteOptions::default()).await.unwrap();
        assert_eq!(first, WriteOutcome::Created);

        table.push_row(vec![Cell::text("dog")]);
        let second = store.write("Sheet1", &table, &WriteOptions::default()).await.unwrap();
        assert_eq!(second, WriteOutcome::Replaced);

        assert_eq!(store.read("Sheet1").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_worksheet_is_data_access_error() {
        let store = MemoryStore::new();
        let err = store.read("nope").await.unwrap_err();
        assert!(matches!(err, SurveyError::DataAccess(_)));
    }
}
