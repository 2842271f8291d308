//! Stimuli Module
//!
//! Fixed natural-language templates filled with sampled words:
//! - faultless-disagreement prompts (one adjective, one noun)
//! - adjective word-order pairs (two adjectives, one noun)

pub mod chooser;
pub mod faultless;
pub mod word_order;

pub use chooser::WordChooser;

use serde::{Deserialize, Serialize};

use crate::error::{SurveyError, SurveyResult};
use crate::lexicon::comparative_form;

/// A generated prompt with the stratum it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Choose one noun with the caller's chooser
pub fn pick_noun<'a>(nouns: &'a [String], chooser: &mut WordChooser) -> SurveyResult<&'a str> {
    chooser
        .choose(nouns)
        .map(String::as_str)
        .ok_or_else(|| SurveyError::insufficient("nouns", "noun pool is empty"))
}

/// Faultless-disagreement prompt for one adjective and one noun
pub fn comparison_phrase(noun: &str, adjective: &str) -> String {
    let comparative = comparative_form(adjective);
    format!(
        "Mary thinks this {noun} is {comparative} than that {noun}.\n\
         John doesn't think so.\n\
         Can they both be right or must one be wrong?"
    )
}

/// Seeded noun choice plus [`comparison_phrase`].
///
/// The noun pool must already be filtered for animacy by the caller.
pub fn build_comparison_phrase(nouns: &[String], adjective: &str, seed: u64) -> SurveyResult<String> {
    let mut chooser = WordChooser::new(seed);
    let noun = pick_noun(nouns, &mut chooser)?;
    Ok(comparison_phrase(noun, adjective))
}

/// Both surface orders of two adjectives before a noun; the first element
/// keeps the argument order.
pub fn build_order_pair(noun: &str, adjective_1: &str, adjective_2: &str) -> (String, String) {
    (
        format!("the {} {} {}", adjective_1, adjective_2, noun),
        format!("the {} {} {}", adjective_2, adjective_1, noun),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nouns(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_comparison_phrase_template() {
        assert_eq!(
            comparison_phrase("cat", "slow"),
            "Mary thinks this cat is slower than that cat.\nJohn doesn't think so.\nCan they both be right or must one be wrong?"
        );
        assert!(comparison_phrase("river", "narrow").contains("is more narrow than"));
    }

    #[test]
    fn test_build_comparison_phrase_with_seed() {
        let pool = nouns(&["cat", "dog", "bird"]);
        assert_eq!(
            build_comparison_phrase(&pool, "slow", 123).unwrap(),
            "Mary thinks this cat is slower than that cat.\nJohn doesn't think so.\nCan they both be right or must one be wrong?"
        );
    }

    #[test]
    fn test_build_comparison_phrase_is_repeatable() {
        let pool = nouns(&["cat", "dog", "bird"]);
        let first = build_comparison_phrase(&pool, "slow", 123).unwrap();
        for _ in 0..5 {
            assert_eq!(build_comparison_phrase(&pool, "slow", 123).unwrap(), first);
        }
    }

    #[test]
    fn test_empty_noun_pool() {
        let err = build_comparison_phrase(&[], "slow", 1).unwrap_err();
        assert!(matches!(err, SurveyError::InsufficientData { group, .. } if group == "nouns"));
    }

    #[test]
    fn test_build_order_pair() {
        assert_eq!(
            build_order_pair("chair", "old", "soft"),
            ("the old soft chair".to_string(), "the soft old chair".to_string())
        );
    }
}
