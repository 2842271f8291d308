//! Seeded word choice.
//!
//! A Mersenne Twister keyed the way CPython's `random.seed(int)` keys it,
//! with `random.choice`'s rejection sampling, so a seed picks the same word
//! a Python run of the survey scripts would.

use rand_mt::Mt19937GenRand32;

pub struct WordChooser {
    mt: Mt19937GenRand32,
}

impl WordChooser {
    pub fn new(seed: u64) -> Self {
        // little-endian 32-bit words, high zero word dropped
        let lo = seed as u32;
        let hi = (seed >> 32) as u32;
        let key: Vec<u32> = if hi == 0 { vec![lo] } else { vec![lo, hi] };
        Self {
            mt: Mt19937GenRand32::new_with_key(key.iter().copied()),
        }
    }

    /// `getrandbits(k)` for 1 <= k <= 64
    fn random_bits(&mut self, k: u32) -> u64 {
        let mut value = 0u64;
        let mut remaining = k;
        let mut shift = 0;
        while remaining > 0 {
            let mut word = self.mt.next_u32() as u64;
            if remaining < 32 {
                word >>= 32 - remaining;
            }
            value |= word << shift;
            shift += 32;
            remaining = remaining.saturating_sub(32);
        }
        value
    }

    /// Uniform index in `0..n`; `n` must be non-zero.
    pub fn below(&mut self, n: usize) -> usize {
        let n = n as u64;
        let k = 64 - n.leading_zeros();
        let mut r = self.random_bits(k);
        while r >= n {
            r = self.random_bits(k);
        }
        r as usize
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            Some(&items[self.below(items.len())])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_choice_sequence_for_seed() {
        let letters = ["a", "b", "c", "d", "e"];
        let mut chooser = WordChooser::new(123);
        let picks: Vec<&str> = (0..6).map(|_| *chooser.choose(&letters).unwrap()).collect();
        assert_eq!(picks, vec!["a", "c", "a", "d", "c", "a"]);
    }

    #[test]
    fn test_wide_seed_uses_both_words() {
        let digits: Vec<u32> = (0..10).collect();
        let mut chooser = WordChooser::new((1u64 << 40) + 5);
        assert_eq!(chooser.choose(&digits), Some(&8));
    }

    #[test]
    fn test_empty_slice() {
        let empty: [&str; 0] = [];
        assert_eq!(WordChooser::new(1).choose(&empty), None);
    }
}
