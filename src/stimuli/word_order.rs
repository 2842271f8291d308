//! Adjective word-order pairs rated on a 1–5 scale.
//!
//! Each item pairs the predicted order (first-class adjective outermost,
//! e.g. age before physical) with its alternate.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{build_order_pair, WordChooser};
use crate::error::{SurveyError, SurveyResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub noun: String,
    pub first_adjective: String,
    pub second_adjective: String,
    /// "the {first} {second} {noun}"
    pub predicted: String,
    /// "the {second} {first} {noun}"
    pub alternate: String,
}

impl OrderItem {
    /// Scale spec for the survey tool: low end is the alternate order.
    pub fn scale_spec(&self) -> String {
        format!("1,5,{},{}", self.alternate, self.predicted)
    }
}

fn choose<'a>(words: &'a [String], chooser: &mut WordChooser, pool: &str) -> SurveyResult<&'a str> {
    chooser
        .choose(words)
        .map(String::as_str)
        .ok_or_else(|| SurveyError::insufficient(pool, "word list is empty"))
}

/// Draw `n` (noun, first, second) triples and deduplicate identical scales.
pub fn generate(
    nouns: &[String],
    first_adjectives: &[String],
    second_adjectives: &[String],
    n: usize,
    seed: u64,
) -> SurveyResult<Vec<OrderItem>> {
    let mut chooser = WordChooser::new(seed);
    let mut items: Vec<OrderItem> = Vec::with_capacity(n);

    for _ in 0..n {
        let noun = choose(nouns, &mut chooser, "nouns")?;
        let first = choose(first_adjectives, &mut chooser, "first adjectives")?;
        let second = choose(second_adjectives, &mut chooser, "second adjectives")?;
        let (predicted, alternate) = build_order_pair(noun, first, second);

        let item = OrderItem {
            noun: noun.to_string(),
            first_adjective: first.to_string(),
            second_adjective: second.to_string(),
            predicted,
            alternate,
        };
        if !items.iter().any(|existing| existing.scale_spec() == item.scale_spec()) {
            items.push(item);
        }
    }

    info!("generated {} unique word-order items from {} draws", items.len(), n);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(w: &[&str]) -> Vec<String> {
        w.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_scale_spec_orders_alternate_first() {
        let items = generate(&words(&["chair"]), &words(&["old"]), &words(&["soft"]), 1, 58).unwrap();
        assert_eq!(items[0].predicted, "the old soft chair");
        assert_eq!(items[0].scale_spec(), "1,5,the soft old chair,the old soft chair");
    }

    #[test]
    fn test_duplicates_collapse() {
        let items = generate(&words(&["chair"]), &words(&["old"]), &words(&["soft"]), 10, 58).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_generate_is_seeded() {
        let nouns = words(&["chair", "table", "box", "ball"]);
        let age = words(&["old", "new", "young"]);
        let physical = words(&["soft", "hard", "big", "small"]);
        let a = generate(&nouns, &age, &physical, 10, 58).unwrap();
        let b = generate(&nouns, &age, &physical, 10, 58).unwrap();
        assert_eq!(a, b);
        assert!(a.len() <= 10 && !a.is_empty());
    }

    #[test]
    fn test_draw_order_for_seed() {
        let items = generate(
            &words(&["chair", "table", "cat"]),
            &words(&["old", "young", "new"]),
            &words(&["soft", "heavy"]),
            4,
            58,
        )
        .unwrap();
        let triples: Vec<(&str, &str, &str)> = items
            .iter()
            .map(|i| (i.noun.as_str(), i.first_adjective.as_str(), i.second_adjective.as_str()))
            .collect();
        assert_eq!(
            triples,
            vec![
                ("cat", "old", "soft"),
                ("cat", "new", "soft"),
                ("chair", "old", "heavy"),
                ("table", "young", "heavy"),
            ]
        );
    }

    #[test]
    fn test_empty_adjective_list() {
        let err = generate(&words(&["chair"]), &[], &words(&["soft"]), 3, 1).unwrap_err();
        assert!(matches!(err, SurveyError::InsufficientData { group, .. } if group == "first adjectives"));
    }
}
