//! Faultless-disagreement prompts built from a stratified adjective sample.

use tracing::{debug, info};

use super::{comparison_phrase, pick_noun, Phrase, WordChooser};
use crate::error::SurveyResult;
use crate::lexicon::{LexicalItem, Lexicon, WordClass};
use crate::sampling::{StratifiedSampler, StimulusSample};

/// Generated prompts plus the sample they were drawn from
#[derive(Debug, Clone)]
pub struct FaultlessStimuli {
    pub phrases: Vec<Phrase>,
    pub sample: StimulusSample,
}

impl FaultlessStimuli {
    /// Sampled adjectives that received a prompt, in prompt order
    pub fn prompted_items(&self) -> &[LexicalItem] {
        &self.sample.items[..self.phrases.len().min(self.sample.items.len())]
    }
}

/// Sample `sample_size` adjectives and write a prompt for the first `n`.
///
/// Adjectives marked animate only pair with animate nouns. Noun choice uses
/// one generator seeded from `seed` for the whole batch.
pub fn write_questions(
    lexicon: &Lexicon,
    n: usize,
    sample_size: usize,
    seed: u64,
) -> SurveyResult<FaultlessStimuli> {
    let animate_nouns = lexicon.animate_nouns();
    let all_nouns = lexicon.words_of_class(WordClass::Noun);

    let sample = StratifiedSampler::new(sample_size, seed)
        .with_class(WordClass::Adjective)
        .sample(lexicon)?;

    let mut chooser = WordChooser::new(seed);
    let mut phrases = Vec::with_capacity(n.min(sample.len()));
    for adjective in sample.items.iter().take(n) {
        let pool = if adjective.requires_animate() { &animate_nouns } else { &all_nouns };
        let noun = pick_noun(pool, &mut chooser)?;
        debug!("'{}' ({}/{}) paired with '{}'", adjective.word, adjective.category, adjective.kind, noun);

        phrases.push(Phrase {
            text: comparison_phrase(noun, &adjective.word),
            category: adjective.category.clone(),
            kind: adjective.kind.clone(),
        });
    }

    info!(
        "wrote {} faultless-disagreement prompts from {} sampled adjectives (pool {})",
        phrases.len(),
        sample.len(),
        sample.pool_size
    );
    Ok(FaultlessStimuli { phrases, sample })
}
