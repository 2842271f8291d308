//! Survey two: word-order preference.

use tracing::info;

use super::SurveyContext;
use crate::analysis::word_order::{analyze, WordOrderReport};
use crate::error::SurveyResult;
use crate::lexicon::WordClass;
use crate::stimuli::word_order::{generate, OrderItem};
use crate::store::WriteOutcome;
use crate::survey::{SurveyPublisher, SurveySheet, WordOrderRow};

pub const WORD_ORDER_RESULTS_CHART: &str = "word_order_results.jpg";

#[derive(Debug)]
pub struct WordOrderRun {
    pub items: Vec<OrderItem>,
    pub outcome: WriteOutcome,
}

/// Draw noun/adjective triples, drop repeated scales and publish.
pub async fn make_survey(ctx: &SurveyContext<'_>) -> SurveyResult<WordOrderRun> {
    let settings = &ctx.config.word_order;
    let lexicon = ctx.load_lexicon(&settings.stimuli_worksheet).await?;

    let nouns = lexicon.words_of_class(WordClass::Noun);
    let first = lexicon.words_in_category(&settings.first_category);
    let second = lexicon.words_in_category(&settings.second_category);
    info!(
        "{} nouns, {} '{}' and {} '{}' adjectives",
        nouns.len(),
        first.len(),
        settings.first_category,
        second.len(),
        settings.second_category
    );

    let items = generate(&nouns, &first, &second, settings.draws, settings.seed)?;
    let sheet: SurveySheet<WordOrderRow> = items.iter().cloned().map(WordOrderRow::new).collect();

    let outcome = SurveyPublisher::new(ctx.store)
        .with_options(ctx.config.write_options())
        .publish(&settings.survey_worksheet, &sheet)
        .await?;

    Ok(WordOrderRun { items, outcome })
}

/// Read per-item rating counts, test the preference groups and chart means.
pub async fn analyze_results(ctx: &SurveyContext<'_>) -> SurveyResult<WordOrderReport> {
    let table = ctx.store.read(&ctx.config.word_order.results_worksheet).await?;
    let report = analyze(&table)?;
    ctx.render(&report.to_chart(), WORD_ORDER_RESULTS_CHART)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::RecordingChartSink;
    use crate::config::SurveyConfig;
    use crate::lexicon::{LexicalItem, Lexicon};
    use crate::store::{Cell, MemoryStore, Table, TableStore};

    fn lexicon() -> Lexicon {
        Lexicon::new(vec![
            LexicalItem::new("old", WordClass::Adjective, "age", "objective", None),
            LexicalItem::new("new", WordClass::Adjective, "age", "objective", None),
            LexicalItem::new("soft", WordClass::Adjective, "physical", "objective", None),
            LexicalItem::new("chair", WordClass::Noun, "", "", None),
        ])
    }

    #[tokio::test]
    async fn test_make_survey_writes_scale_rows() {
        let store = MemoryStore::new();
        let charts = RecordingChartSink::new();
        let config = SurveyConfig::default();
        store.insert("word_order_adjectives", lexicon().to_table()).await;

        let ctx = SurveyContext::new(&store, &charts, &config);
        let run = make_survey(&ctx).await.unwrap();
        // only two distinct (first, second) pairs exist
        assert!(!run.items.is_empty() && run.items.len() <= 2);

        let published = store.read("Word Order Preference").await.unwrap();
        assert_eq!(published.header, vec!["question", "type", "required", "start", "end"]);
        assert_eq!(published.len(), run.items.len());
        assert_eq!(published.rows[0][3], Cell::text(run.items[0].scale_spec()));
    }

    #[tokio::test]
    async fn test_analyze_results() {
        let store = MemoryStore::new();
        let charts = RecordingChartSink::new();
        let config = SurveyConfig::default();

        let mut results = Table::new(["question", "1", "2", "3", "4", "5"]);
        results.push_row(vec!["q1".into(), 1.0.into(), 2.0.into(), 3.0.into(), 7.0.into(), 9.0.into()]);
        results.push_row(vec!["q2".into(), 0.0.into(), 1.0.into(), 4.0.into(), 8.0.into(), 6.0.into()]);
        store.insert("Word Order Preference", results).await;

        let ctx = SurveyContext::new(&store, &charts, &config);
        let report = analyze_results(&ctx).await.unwrap();
        assert_eq!(report.items, 2);
        assert_eq!(report.test.df, 2);
        assert!(charts.rendered()[0].0.ends_with(WORD_ORDER_RESULTS_CHART));
    }
}
