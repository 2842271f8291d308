//! Survey Configuration
//!
//! Settings load from an optional YAML file, after `.env` has been read,
//! and are then overridden by `SURVEY_*` environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SurveyError, SurveyResult};
use crate::store::{JsonDirStore, SheetsStore, TableStore, WriteOptions};

pub const ENV_SPREADSHEET_URL: &str = "SURVEY_SPREADSHEET_URL";
pub const ENV_ACCESS_TOKEN: &str = "SURVEY_ACCESS_TOKEN";
pub const ENV_DATA_DIR: &str = "SURVEY_DATA_DIR";
pub const ENV_OUTPUT_DIR: &str = "SURVEY_OUTPUT_DIR";

/// Where worksheets are read from and written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    #[default]
    Sheets,
    JsonDir,
}

/// Survey one: faultless disagreement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaultlessSettings {
    pub stimuli_worksheet: String,
    pub survey_worksheet: String,
    /// Worksheet the response form writes into; `COUNTIF` formulas point here
    pub answers_worksheet: String,
    pub questions: usize,
    pub sample_size: usize,
    pub seed: u64,
}

impl Default for FaultlessSettings {
    fn default() -> Self {
        Self {
            stimuli_worksheet: "adjectives_to_combine".to_string(),
            survey_worksheet: "Faultless Disagreement".to_string(),
            answers_worksheet: "Faultless_Disagreement_Answers".to_string(),
            questions: 45,
            sample_size: 45,
            seed: 145,
        }
    }
}

/// Survey two: word-order preference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordOrderSettings {
    pub stimuli_worksheet: String,
    pub survey_worksheet: String,
    pub results_worksheet: String,
    /// Category placed first in the predicted order
    pub first_category: String,
    pub second_category: String,
    pub draws: usize,
    pub seed: u64,
}

impl Default for WordOrderSettings {
    fn default() -> Self {
        Self {
            stimuli_worksheet: "word_order_adjectives".to_string(),
            survey_worksheet: "Word Order Preference".to_string(),
            results_worksheet: "Word Order Preference".to_string(),
            first_category: "age".to_string(),
            second_category: "physical".to_string(),
            draws: 10,
            seed: 58,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub backend: Backend,
    pub spreadsheet_url: String,
    /// OAuth bearer token; never written back out
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Root of the json-dir backend
    pub data_dir: PathBuf,
    /// Chart destination
    pub output_dir: PathBuf,
    pub format_sheets: bool,
    pub faultless: FaultlessSettings,
    pub word_order: WordOrderSettings,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            spreadsheet_url: String::new(),
            access_token: None,
            data_dir: PathBuf::from("data/worksheets"),
            output_dir: PathBuf::from("data"),
            format_sheets: false,
            faultless: FaultlessSettings::default(),
            word_order: WordOrderSettings::default(),
        }
    }
}

impl SurveyConfig {
    pub fn from_yaml(yaml: &str) -> SurveyResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub async fn from_file(path: impl AsRef<Path>) -> SurveyResult<Self> {
        let path = path.as_ref();
        let yaml = tokio::fs::read_to_string(path).await.map_err(|e| {
            SurveyError::Configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_yaml(&yaml)?;
        debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// `.env`, then the optional YAML file, then `SURVEY_*` overrides
    pub async fn load(path: Option<&Path>) -> SurveyResult<Self> {
        dotenv::dotenv().ok();
        let mut config = match path {
            Some(path) => Self::from_file(path).await?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(url) = lookup(ENV_SPREADSHEET_URL) {
            self.spreadsheet_url = url;
        }
        if let Some(token) = lookup(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
    }

    pub fn write_options(&self) -> WriteOptions {
        if self.format_sheets {
            WriteOptions::formatted()
        } else {
            WriteOptions::default()
        }
    }

    pub fn chart_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }

    /// Build the store for the configured backend
    pub fn open_store(&self) -> SurveyResult<Box<dyn TableStore>> {
        match self.backend {
            Backend::Sheets => {
                if self.spreadsheet_url.trim().is_empty() {
                    return Err(SurveyError::Configuration(format!(
                        "no spreadsheet configured; set spreadsheet_url or {}",
                        ENV_SPREADSHEET_URL
                    )));
                }
                let token = self.access_token.as_deref().unwrap_or_default();
                if token.trim().is_empty() {
                    return Err(SurveyError::Configuration(format!(
                        "the sheets backend needs an access token in {}",
                        ENV_ACCESS_TOKEN
                    )));
                }
                let store = SheetsStore::new(&self.spreadsheet_url, token)?;
                info!("using spreadsheet {}", store.spreadsheet_id());
                Ok(Box::new(store))
            }
            Backend::JsonDir => {
                info!("using worksheet directory {}", self.data_dir.display());
                Ok(Box::new(JsonDirStore::new(&self.data_dir)))
            }
        }
    }
}
