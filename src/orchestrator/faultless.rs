//! Survey one: faultless disagreement.

use tracing::{info, warn};

use super::SurveyContext;
use crate::analysis::faultless::{analyze, FaultlessReport};
use crate::error::SurveyResult;
use crate::lexicon::WordClass;
use crate::sampling::representativeness::{compare, ShareComparison};
use crate::sampling::Stratum;
use crate::stimuli::faultless::{write_questions, FaultlessStimuli};
use crate::store::WriteOutcome;
use crate::survey::{FaultlessRow, SurveyPublisher, SurveySheet};

pub const CATEGORY_DISTRIBUTION_CHART: &str = "category_distribution.jpg";
pub const TYPE_DISTRIBUTION_CHART: &str = "type_distribution.jpg";
pub const FAULTLESS_RESULTS_CHART: &str = "faultless_results.jpg";

#[derive(Debug)]
pub struct FaultlessRun {
    pub stimuli: FaultlessStimuli,
    pub sheet: SurveySheet<FaultlessRow>,
    /// Category then type share comparisons
    pub representativeness: Vec<ShareComparison>,
    pub outcome: WriteOutcome,
}

/// Sample adjectives, write prompts, chart sample coverage and publish.
pub async fn make_survey(ctx: &SurveyContext<'_>) -> SurveyResult<FaultlessRun> {
    let settings = &ctx.config.faultless;
    let lexicon = ctx.load_lexicon(&settings.stimuli_worksheet).await?;
    let stimuli = write_questions(&lexicon, settings.questions, settings.sample_size, settings.seed)?;
    if stimuli.sample.shortfall() > 0 {
        warn!(
            "sample is {} short of the requested {} adjectives",
            stimuli.sample.shortfall(),
            settings.sample_size
        );
    }

    let sheet: SurveySheet<FaultlessRow> = stimuli
        .phrases
        .iter()
        .cloned()
        .map(|phrase| FaultlessRow::new(phrase, settings.answers_worksheet.clone()))
        .collect();

    let mut representativeness = Vec::with_capacity(2);
    for (stratum, file_name) in [
        (Stratum::Category, CATEGORY_DISTRIBUTION_CHART),
        (Stratum::Type, TYPE_DISTRIBUTION_CHART),
    ] {
        let comparison = compare(lexicon.of_class(WordClass::Adjective), stimuli.prompted_items(), stratum);
        info!(
            "{:?} shares: largest population/sample gap {:.3}",
            stratum,
            comparison.max_deviation()
        );
        ctx.render(&comparison.to_chart(), file_name)?;
        representativeness.push(comparison);
    }

    let outcome = SurveyPublisher::new(ctx.store)
        .with_options(ctx.config.write_options())
        .publish(&settings.survey_worksheet, &sheet)
        .await?;

    Ok(FaultlessRun {
        stimuli,
        sheet,
        representativeness,
        outcome,
    })
}

/// Read the scored survey sheet and chart mean disagreement per class.
pub async fn analyze_results(ctx: &SurveyContext<'_>) -> SurveyResult<FaultlessReport> {
    let table = ctx.store.read(&ctx.config.faultless.survey_worksheet).await?;
    let report = analyze(&table)?;
    ctx.render(&report.to_chart(), FAULTLESS_RESULTS_CHART)?;
    Ok(report)
}
