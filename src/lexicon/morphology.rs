//! Syllable counting and comparative inflection.
//!
//! The comparative rule is deliberately naive: it never doubles a final
//! consonant, so `big` becomes `biger`. Survey stimuli already published
//! were built with this rule and must stay reproducible.

const VOWELS: &str = "aeiouy";

fn is_vowel(c: char) -> bool {
    VOWELS.contains(c)
}

/// Count syllables by vowel-group onsets with silent-e and consonant+le fixes.
pub fn count_syllables(word: &str) -> usize {
    let word = word.to_lowercase();
    if word == "i" {
        return 1;
    }

    let chars: Vec<char> = word.chars().collect();
    let Some(&first) = chars.first() else {
        return 0;
    };

    let mut count = usize::from(is_vowel(first));
    for pair in chars.windows(2) {
        if is_vowel(pair[1]) && !is_vowel(pair[0]) {
            count += 1;
        }
    }

    if word.ends_with('e') {
        count = count.saturating_sub(1);
    }

    if word.ends_with("le") && chars.len() > 2 && !is_vowel(chars[chars.len() - 3]) {
        count += 1;
    }

    count
}

pub fn has_multiple_syllables(word: &str) -> bool {
    count_syllables(word) > 1
}

/// Comparative form: `more X` for polysyllables, otherwise `-r`/`-er`.
pub fn comparative_form(adjective: &str) -> String {
    if has_multiple_syllables(adjective) {
        format!("more {}", adjective)
    } else if adjective == "best" {
        "better".to_string()
    } else if adjective.ends_with('e') {
        format!("{}r", adjective)
    } else {
        format!("{}er", adjective)
    }
}
