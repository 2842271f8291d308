//! JSON Directory Store
//!
//! Keeps each worksheet as a pretty-printed JSON file inside one directory,
//! so surveys can be generated and analyzed without network access.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::{Table, TableStore, WriteOptions, WriteOutcome};
use crate::error::{SurveyError, SurveyResult};

#[derive(Debug, Serialize, Deserialize)]
struct WorksheetFile {
    worksheet: String,
    table: Table,
}

pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a worksheet title
    pub fn path_for(&self, worksheet: &str) -> PathBuf {
        let stem: String = worksheet
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", stem))
    }
}

#[async_trait]
impl TableStore for JsonDirStore {
    fn name(&self) -> &str {
        "json-dir"
    }

    async fn read(&self, worksheet: &str) -> SurveyResult<Table> {
        let path = self.path_for(worksheet);
        if !path.exists() {
            return Err(SurveyError::DataAccess(format!(
                "worksheet '{}' not found at {}",
                worksheet,
                path.display()
            )));
        }

        let json = fs::read_to_string(&path).await?;
        let file: WorksheetFile = serde_json::from_str(&json)?;
        if file.worksheet != worksheet {
            return Err(SurveyError::DataAccess(format!(
                "{} holds worksheet '{}', not '{}'",
                path.display(),
                file.worksheet,
                worksheet
            )));
        }
        Ok(file.table)
    }

    async fn write(
        &self,
        worksheet: &str,
        table: &Table,
        _options: &WriteOptions,
    ) -> SurveyResult<WriteOutcome> {
        fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(worksheet);
        let outcome = if path.exists() {
            // titles that map to the same file must not overwrite each other
            let existing: WorksheetFile = serde_json::from_str(&fs::read_to_string(&path).await?)?;
            if existing.worksheet != worksheet {
                return Err(SurveyError::DataAccess(format!(
                    "{} already holds worksheet '{}', cannot store '{}'",
                    path.display(),
                    existing.worksheet,
                    worksheet
                )));
            }
            WriteOutcome::Replaced
        } else {
            WriteOutcome::Created
        };

        let file = WorksheetFile {
            worksheet: worksheet.to_string(),
            table: table.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;

        // Whole-file replace: write beside the target, then rename over it.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).await?;
        fs::rename(&tmp, &path).await?;

        debug!("wrote worksheet '{}' to {} ({:?})", worksheet, path.display(), outcome);
        Ok(outcome)
    }
}
