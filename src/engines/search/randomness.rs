use crate::error::{GeneError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use rand::SeedableRng;

const WORD_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";

/// Source of every random decision taken by the genes
pub struct Randomness {
    rng: StdRng,
}

impl Randomness {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(Some(seed))
    }

    /// Uniform in [0, 1)
    pub fn next_double(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }

    pub fn next_boolean(&mut self, probability: f64) -> bool {
        if probability <= 0.0 {
            return false;
        }
        if probability >= 1.0 {
            return true;
        }
        self.rng.gen_bool(probability)
    }

    pub fn coin(&mut self) -> bool {
        self.rng.gen::<bool>()
    }

    /// Uniform in [0, bound)
    pub fn next_int(&mut self, bound: usize) -> Result<usize> {
        if bound == 0 {
            return Err(GeneError::EmptyChoice);
        }
        Ok(self.rng.gen_range(0..bound))
    }

    /// Uniform in [min, max], both inclusive
    pub fn next_int_between(&mut self, min: i64, max: i64) -> i64 {
        if min >= max {
            return min;
        }
        self.rng.gen_range(min..=max)
    }

    pub fn choose<T: Clone>(&mut self, items: &[T]) -> Result<T> {
        items.choose(&mut self.rng).cloned().ok_or(GeneError::EmptyChoice)
    }

    pub fn next_word_char(&mut self) -> char {
        WORD_CHARS[self.rng.gen_range(0..WORD_CHARS.len())] as char
    }

    /// Word string with a length uniform in [min, max]
    pub fn next_word_string(&mut self, min: usize, max: usize) -> String {
        let len = self.next_int_between(min as i64, max.max(min) as i64) as usize;
        (0..len).map(|_| self.next_word_char()).collect()
    }
}
