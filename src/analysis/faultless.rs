//! Faultless-disagreement results.
//!
//! Each survey row carries `category`, `type` and `percent_yes` (share of
//! respondents answering "They can both be right."). Mean rates per
//! category predict adjective order: a higher rate of faultless
//! disagreement means a more subjective adjective class.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::is_sheet_error;
use super::stats::{describe, kruskal_wallis, Descriptives, Group, KruskalWallis};
use crate::chart::BarChart;
use crate::error::{SurveyError, SurveyResult};
use crate::store::{Cell, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTypeMean {
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub n: usize,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaultlessReport {
    /// Sorted by mean, highest first
    pub means: Vec<CategoryTypeMean>,
    pub categories: Vec<Descriptives>,
    /// Present when at least two categories have responses
    pub test: Option<KruskalWallis>,
}

impl FaultlessReport {
    /// Categories in descending mean order (first appearance in `means`)
    pub fn category_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = Vec::new();
        for m in &self.means {
            if !order.contains(&m.category.as_str()) {
                order.push(&m.category);
            }
        }
        order
    }

    pub fn to_chart(&self) -> BarChart {
        let mut chart = BarChart::new("Predicted Adjective Order based on Mean Faultless Disagreement Rate")
            .with_axes("Adjective Class", "Mean Rate of Faultless Disagreement (Percentage)");
        for category in self.category_order() {
            for m in self.means.iter().filter(|m| m.category == category) {
                chart.push(&m.category, &m.kind, m.mean);
            }
        }
        chart
    }
}

/// Percentage reading of a `percent_yes` cell.
///
/// `"57.1%"` is already a percentage; a bare number is the raw `H/J`
/// fraction and is scaled by 100.
pub fn percent_value(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Text(s) if s.trim().ends_with('%') => cell.as_f64(),
        Cell::Text(_) | Cell::Number(_) => cell.as_f64().map(|v| v * 100.0),
        _ => None,
    }
}

pub fn analyze(table: &Table) -> SurveyResult<FaultlessReport> {
    table.require_column("category")?;
    table.require_column("type")?;
    table.require_column("percent_yes")?;

    // (category, type) in first-appearance order, with their rates
    let mut cells: Vec<(String, String, Vec<f64>)> = Vec::new();
    for record in table.records() {
        let Some(cell) = record.get("percent_yes").filter(|c| !c.is_empty()) else {
            continue;
        };
        if is_sheet_error(cell) {
            warn!("row {}: no responses yet ({})", record.sheet_row(), cell);
            continue;
        }
        let rate = percent_value(cell).ok_or_else(|| {
            SurveyError::Validation(format!(
                "row {}: percent_yes '{}' is not a percentage",
                record.sheet_row(),
                cell
            ))
        })?;

        let category = record.text("category").unwrap_or_default();
        let kind = record.text("type").unwrap_or_default();
        match cells.iter_mut().find(|(c, k, _)| *c == category && *k == kind) {
            Some((_, _, rates)) => rates.push(rate),
            None => cells.push((category, kind, vec![rate])),
        }
    }

    if cells.is_empty() {
        return Err(SurveyError::insufficient("percent_yes", "no scored survey rows"));
    }

    let mut means: Vec<CategoryTypeMean> = cells
        .iter()
        .map(|(category, kind, rates)| CategoryTypeMean {
            category: category.clone(),
            kind: kind.clone(),
            n: rates.len(),
            mean: rates.iter().sum::<f64>() / rates.len() as f64,
        })
        .collect();
    // stable: equal means keep sheet order
    means.sort_by(|a, b| b.mean.total_cmp(&a.mean));

    let mut by_category: Vec<Group> = Vec::new();
    for (category, _, rates) in &cells {
        match by_category.iter_mut().find(|g| &g.name == category) {
            Some(group) => group.values.extend(rates),
            None => by_category.push(Group::new(category.clone(), rates.iter().copied())),
        }
    }

    let categories = by_category
        .iter()
        .map(|g| describe(&g.name, &g.values))
        .collect::<SurveyResult<Vec<_>>>()?;

    let test = if by_category.len() >= 2 {
        match kruskal_wallis(&by_category) {
            Ok(result) => Some(result),
            Err(e) => {
                warn!("skipping category comparison: {}", e);
                None
            }
        }
    } else {
        None
    };

    info!(
        "faultless disagreement: {} category/type cells across {} categories",
        means.len(),
        categories.len()
    );

    Ok(FaultlessReport { means, categories, test })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Table {
        let mut table = Table::new(["phrase", "category", "type", "percent_yes"]);
        let rows = [
            ("p1", "age", "objective", Cell::text("20%")),
            ("p2", "taste", "subjective", Cell::text("80%")),
            ("p3", "age", "objective", Cell::text("40%")),
            ("p4", "color", "objective", Cell::Number(0.5)),
            ("p5", "taste", "subjective", Cell::text("#DIV/0!")),
            ("p6", "taste", "evaluative", Cell::text("70%")),
        ];
        for (phrase, category, kind, rate) in rows {
            table.push_row(vec![phrase.into(), category.into(), kind.into(), rate]);
        }
        table
    }

    #[test]
    fn test_percent_value() {
        assert_eq!(percent_value(&Cell::text("57.5%")), Some(57.5));
        assert_eq!(percent_value(&Cell::Number(0.25)), Some(25.0));
        assert_eq!(percent_value(&Cell::Bool(true)), None);
    }

    #[test]
    fn test_means_sorted_descending() {
        let report = analyze(&results()).unwrap();
        let order: Vec<(&str, &str, f64)> = report
            .means
            .iter()
            .map(|m| (m.category.as_str(), m.kind.as_str(), m.mean))
            .collect();
        assert_eq!(
            order,
            vec![
                ("taste", "subjective", 80.0),
                ("taste", "evaluative", 70.0),
                ("color", "objective", 50.0),
                ("age", "objective", 30.0),
            ]
        );
        assert_eq!(report.category_order(), vec!["taste", "color", "age"]);
    }

    #[test]
    fn test_category_descriptives_and_test() {
        let report = analyze(&results()).unwrap();
        let age = report.categories.iter().find(|d| d.name == "age").unwrap();
        assert_eq!(age.n, 2);
        assert_eq!(age.mean, 30.0);
        assert!(report.test.is_some());
        assert_eq!(report.to_chart().groups(), vec!["taste", "color", "age"]);
    }

    #[test]
    fn test_no_scored_rows() {
        let mut table = Table::new(["category", "type", "percent_yes"]);
        table.push_row(vec!["age".into(), "objective".into(), Cell::text("#DIV/0!")]);
        assert!(matches!(analyze(&table), Err(SurveyError::InsufficientData { .. })));
    }
}
