//! Word-order preference results.
//!
//! The results sheet has one row per item and columns `1`..`5` holding how
//! many respondents picked each scale point. Points 1–2 favour the
//! alternate order, 3 is neutral, 4–5 favour the predicted order.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::numeric_column;
use super::stats::{describe, kruskal_wallis, mean, Descriptives, Group, KruskalWallis};
use crate::chart::BarChart;
use crate::error::{SurveyError, SurveyResult};
use crate::store::Table;

pub const RATING_COLUMNS: [&str; 5] = ["1", "2", "3", "4", "5"];

pub const RATING_LABELS: [&str; 5] = [
    "Strong Preference for Alternate",
    "Slight Preference for Alternate",
    "No Preference for Either",
    "Slight Preference for Predicted",
    "Strong Preference for Predicted",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMean {
    pub rating: String,
    pub label: String,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordOrderReport {
    pub items: usize,
    pub rating_means: Vec<RatingMean>,
    pub groups: Vec<Descriptives>,
    pub test: KruskalWallis,
}

impl WordOrderReport {
    pub fn to_chart(&self) -> BarChart {
        let mut chart = BarChart::new("Mean Preference Ratings").with_axes("Rating", "Average Preference Rating");
        for rating in &self.rating_means {
            chart.push(&rating.label, "mean", rating.mean);
        }
        chart
    }
}

/// Preference groups: alternate (1, 2), neutral (3), predicted (4, 5)
pub fn preference_groups(table: &Table) -> SurveyResult<Vec<Group>> {
    let mut columns = Vec::with_capacity(RATING_COLUMNS.len());
    for column in RATING_COLUMNS {
        columns.push(numeric_column(table, column)?);
    }

    Ok(vec![
        Group::new("prefers alternate", columns[0].iter().chain(&columns[1]).copied()),
        Group::new("neutral", columns[2].iter().copied()),
        Group::new("prefers predicted", columns[3].iter().chain(&columns[4]).copied()),
    ])
}

pub fn analyze(table: &Table) -> SurveyResult<WordOrderReport> {
    let mut rating_means = Vec::with_capacity(RATING_COLUMNS.len());
    for (column, label) in RATING_COLUMNS.iter().zip(RATING_LABELS) {
        let values = numeric_column(table, column)?;
        rating_means.push(RatingMean {
            rating: column.to_string(),
            label: label.to_string(),
            mean: mean(&values)
                .map_err(|_| SurveyError::insufficient(*column, "no responses recorded"))?,
        });
    }

    let groups = preference_groups(table)?;
    let test = kruskal_wallis(&groups)?;
    let groups = groups
        .iter()
        .map(|g| describe(&g.name, &g.values))
        .collect::<SurveyResult<Vec<_>>>()?;

    info!(
        "word order: H = {:.4}, p = {:.4} over {} items",
        test.statistic,
        test.p_value,
        table.len()
    );

    Ok(WordOrderReport {
        items: table.len(),
        rating_means,
        groups,
        test,
    })
}
