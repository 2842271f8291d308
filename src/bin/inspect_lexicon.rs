use anyhow::{Context, Result};
use std::env;
use tracing::info;

use gradability_survey::config::SurveyConfig;
use gradability_survey::lexicon::Lexicon;
use gradability_survey::utils::init_logging;

/// Print class/category/type counts for a lexicon worksheet.
///
/// Usage: inspect_lexicon [worksheet]   (defaults to the faultless stimuli sheet)
#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let config = SurveyConfig::load(None).await?;
    let worksheet = env::args()
        .nth(1)
        .unwrap_or_else(|| config.faultless.stimuli_worksheet.clone());

    let store = config.open_store()?;
    let table = store
        .read(&worksheet)
        .await
        .with_context(|| format!("Failed to read worksheet '{}'", worksheet))?;
    let lexicon = Lexicon::from_table(&table)?;
    info!("{} items in '{}' via {}", lexicon.len(), worksheet, store.name());

    println!("{:<10} {:<20} {:<20} {:>5}", "class", "category", "type", "count");
    println!("{}", "-".repeat(58));
    for ((class, category, kind), count) in lexicon.summary() {
        println!("{:<10} {:<20} {:<20} {:>5}", class.as_str(), category, kind, count);
    }
    Ok(())
}
