use gradability_survey::chart::RasterChartSink;
use gradability_survey::config::{Backend, SurveyConfig};
use gradability_survey::orchestrator::{faultless, word_order, SurveyContext};
use gradability_survey::store::{Cell, JsonDirStore, Table, TableStore, WriteOptions, WriteOutcome};
use tempfile::tempdir;

fn lexicon_sheet() -> Table {
    let mut table = Table::new(["word", "class", "category", "type", "animate"]);
    let rows = [
        ("old", "adjective", "age", "objective", "FALSE"),
        ("young", "adjective", "age", "objective", "FALSE"),
        ("new", "adjective", "age", "objective", "FALSE"),
        ("soft", "adjective", "physical", "objective", "FALSE"),
        ("heavy", "adjective", "physical", "objective", "FALSE"),
        ("tasty", "adjective", "taste", "subjective", "FALSE"),
        ("brave", "adjective", "human", "subjective", "TRUE"),
        ("chair", "noun", "", "", "FALSE"),
        ("table", "noun", "", "", "FALSE"),
        ("cat", "noun", "", "", "TRUE"),
    ];
    for (word, class, category, kind, animate) in rows {
        table.push_row(vec![word.into(), class.into(), category.into(), kind.into(), animate.into()]);
    }
    table
}

fn config(root: &std::path::Path) -> SurveyConfig {
    let mut config = SurveyConfig {
        backend: Backend::JsonDir,
        data_dir: root.join("worksheets"),
        output_dir: root.join("charts"),
        ..SurveyConfig::default()
    };
    config.faultless.questions = 7;
    config.faultless.sample_size = 7;
    config.word_order.stimuli_worksheet = config.faultless.stimuli_worksheet.clone();
    config
}

#[tokio::test]
async fn test_faultless_survey_round_trip() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    let store = JsonDirStore::new(&config.data_dir);
    let charts = RasterChartSink::new(320, 240);
    store
        .write(&config.faultless.stimuli_worksheet, &lexicon_sheet(), &WriteOptions::default())
        .await
        .unwrap();

    let ctx = SurveyContext::new(&store, &charts, &config);
    let run = faultless::make_survey(&ctx).await.unwrap();
    assert_eq!(run.outcome, WriteOutcome::Created);
    assert_eq!(run.sheet.len(), 7);
    assert!(config.output_dir.join("category_distribution.jpg").exists());
    assert!(config.output_dir.join("type_distribution.jpg").exists());

    // the brave prompt can only use the animate noun
    let brave = run
        .stimuli
        .phrases
        .iter()
        .find(|p| p.text.contains("more brave") || p.text.contains("braver"))
        .unwrap();
    assert!(brave.text.starts_with("Mary thinks this cat is braver than that cat."));

    // simulate responses: the spreadsheet would have evaluated the formulas
    let mut scored = store.read(&config.faultless.survey_worksheet).await.unwrap();
    let percent = scored.require_column("percent_yes").unwrap();
    let category = scored.require_column("category").unwrap();
    for row in scored.rows.iter_mut() {
        let rate = match row[category].to_string().as_str() {
            "taste" | "human" => "75%",
            _ => "25%",
        };
        row[percent] = Cell::text(rate);
    }
    let outcome = store
        .write(&config.faultless.survey_worksheet, &scored, &WriteOptions::default())
        .await
        .unwrap();
    assert_eq!(outcome, WriteOutcome::Replaced);

    let report = faultless::analyze_results(&ctx).await.unwrap();
    assert_eq!(report.means[0].mean, 75.0);
    assert_eq!(report.means.last().unwrap().mean, 25.0);
    assert!(report.test.is_some());
    assert!(config.output_dir.join("faultless_results.jpg").exists());
}

#[tokio::test]
async fn test_word_order_survey_round_trip() {
    let dir = tempdir().unwrap();
    let config = config(dir.path());
    let store = JsonDirStore::new(&config.data_dir);
    let charts = RasterChartSink::new(320, 240);
    store
        .write(&config.word_order.stimuli_worksheet, &lexicon_sheet(), &WriteOptions::default())
        .await
        .unwrap();

    let ctx = SurveyContext::new(&store, &charts, &config);
    let run = word_order::make_survey(&ctx).await.unwrap();
    assert!(!run.items.is_empty() && run.items.len() <= 10);
    for item in &run.items {
        assert!(["old", "young", "new"].contains(&item.first_adjective.as_str()));
        assert!(["soft", "heavy"].contains(&item.second_adjective.as_str()));
        assert_eq!(item.predicted, format!("the {} {} {}", item.first_adjective, item.second_adjective, item.noun));
    }

    // the same seed reproduces the sheet
    let again = word_order::make_survey(&ctx).await.unwrap();
    assert_eq!(again.items, run.items);
    assert_eq!(again.outcome, WriteOutcome::Replaced);

    let mut results = Table::new(["question", "1", "2", "3", "4", "5"]);
    for (i, counts) in [[1.0, 2.0, 4.0, 9.0, 12.0], [0.0, 3.0, 5.0, 8.0, 10.0], [2.0, 1.0, 6.0, 7.0, 11.0]]
        .iter()
        .enumerate()
    {
        let mut row = vec![Cell::text(format!("q{}", i + 1))];
        row.extend(counts.iter().map(|c| Cell::Number(*c)));
        results.push_row(row);
    }
    store
        .write(&config.word_order.results_worksheet, &results, &WriteOptions::default())
        .await
        .unwrap();

    let report = word_order::analyze_results(&ctx).await.unwrap();
    assert_eq!(report.groups[2].name, "prefers predicted");
    assert!(report.groups[2].mean > report.groups[0].mean);
    assert!(report.test.p_value < 0.05);
    assert!(config.output_dir.join("word_order_results.jpg").exists());
}
