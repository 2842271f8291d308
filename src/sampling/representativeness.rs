//! Population-vs-sample share comparison for a drawn stimulus set.

use serde::{Deserialize, Serialize};

use super::Stratum;
use crate::chart::BarChart;
use crate::lexicon::LexicalItem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareRow {
    pub key: String,
    pub population_share: f64,
    pub sample_share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareComparison {
    pub stratum: Stratum,
    pub rows: Vec<ShareRow>,
}

fn counts<'a>(items: impl IntoIterator<Item = &'a LexicalItem>, stratum: Stratum) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        let key = stratum.key(item);
        match counts.iter_mut().find(|(k, _)| k.as_str() == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key.to_string(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

/// Share of each stratum in the population and in the sample.
///
/// Rows follow population frequency; strata seen only in the sample come last.
pub fn compare<'a, 'b>(
    population: impl IntoIterator<Item = &'a LexicalItem>,
    sample: impl IntoIterator<Item = &'b LexicalItem>,
    stratum: Stratum,
) -> ShareComparison {
    let population = counts(population, stratum);
    let sample = counts(sample, stratum);
    let pop_total: usize = population.iter().map(|(_, n)| n).sum();
    let sample_total: usize = sample.iter().map(|(_, n)| n).sum();

    let share = |n: usize, total: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };
    let lookup = |table: &[(String, usize)], key: &str| {
        table.iter().find(|(k, _)| k.as_str() == key).map_or(0, |(_, n)| *n)
    };

    let mut rows: Vec<ShareRow> = population
        .iter()
        .map(|(key, n)| ShareRow {
            key: key.clone(),
            population_share: share(*n, pop_total),
            sample_share: share(lookup(&sample, key), sample_total),
        })
        .collect();

    for (key, n) in &sample {
        if !rows.iter().any(|r| &r.key == key) {
            rows.push(ShareRow {
                key: key.clone(),
                population_share: 0.0,
                sample_share: share(*n, sample_total),
            });
        }
    }

    ShareComparison { stratum, rows }
}

impl ShareComparison {
    /// Largest absolute gap between population and sample share
    pub fn max_deviation(&self) -> f64 {
        self.rows
            .iter()
            .map(|r| (r.population_share - r.sample_share).abs())
            .fold(0.0, f64::max)
    }

    pub fn to_chart(&self) -> BarChart {
        let label = match self.stratum {
            Stratum::Category => "Category",
            Stratum::Type => "Type",
        };
        let mut chart = BarChart::new(format!("{} distribution: population vs sample", label))
            .with_axes(label, "Share of items");
        for row in &self.rows {
            chart.push(&row.key, "population", row.population_share);
            chart.push(&row.key, "sample", row.sample_share);
        }
        chart
    }
}
