//! Gradability Survey
//!
//! Stimulus generation and response analysis for two adjective-order
//! experiments:
//! - Stratified, seeded sampling of a lexicon of nouns and adjectives
//! - Comparative-adjective prompts for a faultless-disagreement survey
//! - Word-order preference pairs rated on a 1–5 scale
//! - Survey sheets with live tally formulas, published to a table store
//! - Kruskal–Wallis comparison of collected responses, with bar charts

pub mod analysis;
pub mod chart;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod orchestrator;
pub mod sampling;
pub mod stimuli;
pub mod store;
pub mod survey;
pub mod utils;

// Re-exports for convenience
pub use config::SurveyConfig;
pub use error::{SurveyError, SurveyResult};
pub use lexicon::{LexicalItem, Lexicon, WordClass};
pub use orchestrator::SurveyContext;
pub use sampling::{StratifiedSampler, StimulusSample};
pub use store::{Cell, Table, TableStore};
