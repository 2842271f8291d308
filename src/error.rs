//! Error taxonomy for survey generation and analysis.

use thiserror::Error;

pub type SurveyResult<T> = std::result::Result<T, SurveyError>;

#[derive(Debug, Error)]
pub enum SurveyError {
    /// Missing credentials, unreadable config file, unknown backend.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Spreadsheet unreachable, worksheet missing on read, rejected write.
    #[error("data access error: {0}")]
    DataAccess(String),

    /// Sampling or statistics requested from an empty or too-small group.
    #[error("insufficient data for '{group}': {reason}")]
    InsufficientData { group: String, reason: String },

    /// Malformed lexicon or response row.
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl SurveyError {
    pub fn insufficient(group: impl Into<String>, reason: impl Into<String>) -> Self {
        SurveyError::InsufficientData {
            group: group.into(),
            reason: reason.into(),
        }
    }
}
