//! Orchestrator Module
//!
//! End-to-end workflows for the two surveys: build stimuli and publish the
//! survey sheet, or read collected results back and chart them. Each
//! workflow is one sequential batch against a [`TableStore`].

pub mod faultless;
pub mod word_order;

pub use faultless::{FaultlessRun, FAULTLESS_RESULTS_CHART};
pub use word_order::{WordOrderRun, WORD_ORDER_RESULTS_CHART};

use tracing::info;

use crate::chart::{BarChart, ChartSink};
use crate::config::SurveyConfig;
use crate::error::SurveyResult;
use crate::lexicon::Lexicon;
use crate::store::TableStore;

/// Store, chart sink and settings shared by every workflow
pub struct SurveyContext<'a> {
    pub store: &'a dyn TableStore,
    pub charts: &'a dyn ChartSink,
    pub config: &'a SurveyConfig,
}

impl<'a> SurveyContext<'a> {
    pub fn new(store: &'a dyn TableStore, charts: &'a dyn ChartSink, config: &'a SurveyConfig) -> Self {
        Self { store, charts, config }
    }

    pub async fn load_lexicon(&self, worksheet: &str) -> SurveyResult<Lexicon> {
        let table = self.store.read(worksheet).await?;
        let lexicon = Lexicon::from_table(&table)?;
        info!("loaded {} lexical items from '{}'", lexicon.len(), worksheet);
        Ok(lexicon)
    }

    /// Render into `output_dir`
    pub fn render(&self, chart: &BarChart, file_name: &str) -> SurveyResult<()> {
        self.charts.render(chart, &self.config.chart_path(file_name))
    }
}
