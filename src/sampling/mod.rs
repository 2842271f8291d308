//! Stratified Sampling Module
//!
//! Draws a class-filtered sample whose per-stratum counts follow the
//! stratum shares of the candidate pool. Every call builds its own seeded
//! generator, so identical inputs always give identical samples.

pub mod representativeness;

use rand::seq::index;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::error::{SurveyError, SurveyResult};
use crate::lexicon::{LexicalItem, Lexicon, WordClass};

/// Fresh generator for one sampling or phrase-building call
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Column used to form strata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stratum {
    #[default]
    Category,
    Type,
}

impl Stratum {
    pub fn key<'a>(&self, item: &'a LexicalItem) -> &'a str {
        match self {
            Stratum::Category => &item.category,
            Stratum::Type => &item.kind,
        }
    }
}

/// Planned and realised draw for one stratum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StratumQuota {
    pub key: String,
    pub available: usize,
    pub drawn: usize,
}

/// Result of one stratified draw
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StimulusSample {
    pub items: Vec<LexicalItem>,
    pub quotas: Vec<StratumQuota>,
    pub pool_size: usize,
    pub target_size: usize,
}

impl StimulusSample {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn words(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.word.as_str()).collect()
    }

    /// Truncation shortfall against the requested size
    pub fn shortfall(&self) -> usize {
        self.target_size.saturating_sub(self.items.len())
    }
}

#[derive(Debug, Clone)]
pub struct StratifiedSampler {
    target_size: usize,
    seed: u64,
    class: Option<WordClass>,
    stratum: Stratum,
    categories: Option<Vec<String>>,
}

impl StratifiedSampler {
    pub fn new(target_size: usize, seed: u64) -> Self {
        Self {
            target_size,
            seed,
            class: Some(WordClass::Adjective),
            stratum: Stratum::Category,
            categories: None,
        }
    }

    pub fn with_class(mut self, class: WordClass) -> Self {
        self.class = Some(class);
        self
    }

    /// Sample across every class
    pub fn any_class(mut self) -> Self {
        self.class = None;
        self
    }

    pub fn by(mut self, stratum: Stratum) -> Self {
        self.stratum = stratum;
        self
    }

    /// Only draw from the listed categories
    pub fn restricted_to<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    /// Items eligible for the draw
    pub fn pool<'a>(&self, lexicon: &'a Lexicon) -> Vec<&'a LexicalItem> {
        lexicon
            .items()
            .iter()
            .filter(|i| self.class.map_or(true, |c| i.class == c))
            .filter(|i| {
                self.categories
                    .as_ref()
                    .map_or(true, |cats| cats.iter().any(|c| c == &i.category))
            })
            .collect()
    }

    /// Per-stratum quotas, largest stratum first (ties by name)
    pub fn quotas(&self, pool: &[&LexicalItem]) -> Vec<StratumQuota> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for item in pool {
            *counts.entry(self.stratum.key(item)).or_insert(0) += 1;
        }

        let mut quotas: Vec<StratumQuota> = counts
            .into_iter()
            .map(|(key, available)| StratumQuota {
                key: key.to_string(),
                available,
                // floor(share * target) without float rounding; widened so huge targets cannot overflow
                drawn: usize::try_from(available as u128 * self.target_size as u128 / pool.len().max(1) as u128)
                    .unwrap_or(usize::MAX),
            })
            .collect();
        quotas.sort_by(|a, b| b.available.cmp(&a.available).then_with(|| a.key.cmp(&b.key)));
        quotas
    }

    pub fn sample(&self, lexicon: &Lexicon) -> SurveyResult<StimulusSample> {
        let pool = self.pool(lexicon);
        if pool.is_empty() {
            let group = self.class.map_or("lexicon".to_string(), |c| c.to_string());
            return Err(SurveyError::insufficient(group, "no candidate items to sample from"));
        }

        let quotas = self.quotas(&pool);
        let mut rng = seeded_rng(self.seed);
        let mut items = Vec::with_capacity(self.target_size.min(pool.len()));

        for quota in &quotas {
            if quota.drawn > quota.available {
                return Err(SurveyError::insufficient(
                    &quota.key,
                    format!("requested {} items but only {} exist", quota.drawn, quota.available),
                ));
            }

            let members: Vec<&LexicalItem> = pool
                .iter()
                .copied()
                .filter(|i| self.stratum.key(i) == quota.key)
                .collect();

            let mut drawn: Vec<&LexicalItem> = index::sample(&mut rng, members.len(), quota.drawn)
                .into_iter()
                .map(|i| members[i])
                .collect();
            // category-then-type order; stable keeps draw order inside a type
            drawn.sort_by(|a, b| a.kind.cmp(&b.kind));

            debug!("stratum '{}': drew {}/{}", quota.key, quota.drawn, quota.available);
            items.extend(drawn.into_iter().cloned());
        }

        Ok(StimulusSample {
            items,
            quotas,
            pool_size: pool.len(),
            target_size: self.target_size,
        })
    }
}

/// Category-stratified adjective sample
pub fn sample(lexicon: &Lexicon, target_size: usize, seed: u64) -> SurveyResult<StimulusSample> {
    StratifiedSampler::new(target_size, seed).sample(lexicon)
}
