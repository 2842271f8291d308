//! Lexicon Module
//!
//! Parses the stimulus worksheet (`word`, `class`, `category`, `type`,
//! `animate`) into typed lexical items and offers the filters the
//! survey builders need.

pub mod morphology;

pub use morphology::{comparative_form, count_syllables, has_multiple_syllables};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{SurveyError, SurveyResult};
use crate::store::{Cell, Record, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WordClass {
    Noun,
    Adjective,
}

impl WordClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            WordClass::Noun => "noun",
            WordClass::Adjective => "adjective",
        }
    }
}

impl fmt::Display for WordClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WordClass {
    type Err = SurveyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "noun" => Ok(WordClass::Noun),
            "adjective" => Ok(WordClass::Adjective),
            other => Err(SurveyError::Validation(format!("unknown word class '{}'", other))),
        }
    }
}

/// One annotated word from the stimulus worksheet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalItem {
    pub word: String,
    pub class: WordClass,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub animate: Option<bool>,
}

impl LexicalItem {
    pub fn new(
        word: impl Into<String>,
        class: WordClass,
        category: impl Into<String>,
        kind: impl Into<String>,
        animate: Option<bool>,
    ) -> Self {
        Self {
            word: word.into(),
            class,
            category: category.into(),
            kind: kind.into(),
            animate,
        }
    }

    /// Requires an animate noun (e.g. "hungry", "brave")
    pub fn requires_animate(&self) -> bool {
        self.animate == Some(true)
    }

    fn from_record(record: &Record<'_>) -> SurveyResult<Self> {
        let row = record.sheet_row();
        let word = record
            .text("word")
            .ok_or_else(|| SurveyError::Validation(format!("row {}: empty 'word'", row)))?;
        let class = record
            .text("class")
            .ok_or_else(|| SurveyError::Validation(format!("row {}: empty 'class' for '{}'", row, word)))?
            .parse::<WordClass>()
            .map_err(|e| SurveyError::Validation(format!("row {}: {}", row, e)))?;

        let animate = match record.get("animate") {
            None => None,
            Some(cell) if cell.is_empty() => None,
            Some(cell) => Some(cell.as_bool().ok_or_else(|| {
                SurveyError::Validation(format!(
                    "row {}: 'animate' must be TRUE or FALSE, got '{}'",
                    row, cell
                ))
            })?),
        };

        Ok(Self {
            word,
            class,
            category: record.text("category").unwrap_or_default(),
            kind: record.text("type").unwrap_or_default(),
            animate,
        })
    }
}

/// Ordered collection of lexical items
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lexicon {
    items: Vec<LexicalItem>,
}

impl Lexicon {
    pub fn new(items: Vec<LexicalItem>) -> Self {
        Self { items }
    }

    /// Parse a worksheet; `word` and `class` columns are mandatory.
    pub fn from_table(table: &Table) -> SurveyResult<Self> {
        table.require_column("word")?;
        table.require_column("class")?;

        let items = table
            .records()
            .map(|record| LexicalItem::from_record(&record))
            .collect::<SurveyResult<Vec<_>>>()?;
        Ok(Self { items })
    }

    /// Render back to a worksheet
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(["word", "class", "category", "type", "animate"]);
        for item in &self.items {
            table.push_row(vec![
                Cell::text(&item.word),
                Cell::text(item.class.as_str()),
                Cell::text(&item.category),
                Cell::text(&item.kind),
                item.animate.map(Cell::Bool).unwrap_or_default(),
            ]);
        }
        table
    }

    pub fn items(&self) -> &[LexicalItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn of_class(&self, class: WordClass) -> impl Iterator<Item = &LexicalItem> {
        self.items.iter().filter(move |i| i.class == class)
    }

    pub fn words_of_class(&self, class: WordClass) -> Vec<String> {
        self.of_class(class).map(|i| i.word.clone()).collect()
    }

    pub fn animate_nouns(&self) -> Vec<String> {
        self.of_class(WordClass::Noun)
            .filter(|i| i.requires_animate())
            .map(|i| i.word.clone())
            .collect()
    }

    pub fn words_in_category(&self, category: &str) -> Vec<String> {
        self.items
            .iter()
            .filter(|i| i.category == category)
            .map(|i| i.word.clone())
            .collect()
    }

    /// First entry for a word, as a sheet lookup would return
    pub fn find(&self, word: &str) -> Option<&LexicalItem> {
        self.items.iter().find(|i| i.word == word)
    }

    /// Item counts per (class, category, type)
    pub fn summary(&self) -> BTreeMap<(WordClass, String, String), usize> {
        let mut counts = BTreeMap::new();
        for item in &self.items {
            *counts
                .entry((item.class, item.category.clone(), item.kind.clone()))
                .or_insert(0) += 1;
        }
        counts
    }
}
