use crate::config::ArchiveConfig;
use crate::engines::genes::number::IntegerGene;
use crate::engines::genes::string::{char_tracker, StringGene};
use crate::engines::genes::tracker::IntervalTracker;
use crate::engines::search::randomness::Randomness;
use crate::error::Result;
use log::trace;

const SURROGATE_MIN: i64 = 0xD800;
const SURROGATE_MAX: i64 = 0xDFFF;

/// Drives archive-guided mutation: values are sampled inside the preferred
/// interval of the tracker of the dimension being mutated, and those
/// trackers are later narrowed by feedback.
#[derive(Debug, Clone)]
pub struct ArchiveMutator {
    config: ArchiveConfig,
}

impl ArchiveMutator {
    pub fn new(config: ArchiveConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArchiveConfig {
        &self.config
    }

    /// True when one tracker is shared by all characters of a string
    pub fn relax_index_string_gene_mutation(&self) -> bool {
        self.config.relax_index_string_mutation
    }

    /// Whether `[min, max]` still holds a legal code point outside `exclude`
    pub fn check_if_has_candidates(&self, min: i64, max: i64, exclude: &[u32]) -> bool {
        if min > max {
            return false;
        }

        let width = max - min + 1;
        let surrogates = (max.min(SURROGATE_MAX) - min.max(SURROGATE_MIN) + 1).max(0);

        let mut excluded: Vec<i64> = exclude
            .iter()
            .map(|&c| c as i64)
            .filter(|c| (min..=max).contains(c) && !(SURROGATE_MIN..=SURROGATE_MAX).contains(c))
            .collect();
        excluded.sort_unstable();
        excluded.dedup();

        width > surrogates + excluded.len() as i64
    }

    /// Restart the attempt count of a character tracker that just got focus.
    /// Its interval and convergence state are kept.
    pub fn reset_char_mutation_update(&self, tracker: &mut IntervalTracker) {
        tracker.counter = 0;
    }

    /// Random draws first, then a scan from `min` so that a sparse interval
    /// still yields its remaining value
    fn sample<F>(&self, min: i64, max: i64, accept: F, randomness: &mut Randomness) -> Option<i64>
    where
        F: Fn(i64) -> bool,
    {
        if min > max {
            return None;
        }
        for _ in 0..self.config.candidate_sample_attempts {
            let candidate = randomness.next_int_between(min, max);
            if accept(candidate) {
                return Some(candidate);
            }
        }
        (min..=max).find(|&v| accept(v))
    }

    fn sample_code_point(&self, min: i64, max: i64, exclude: &[u32], randomness: &mut Randomness) -> Option<char> {
        if !self.check_if_has_candidates(min, max, exclude) {
            return None;
        }
        let accept = |v: i64| {
            u32::try_from(v)
                .ok()
                .filter(|c| !exclude.contains(c))
                .and_then(char::from_u32)
                .is_some()
        };
        self.sample(min, max, accept, randomness)
            .and_then(|v| u32::try_from(v).ok())
            .and_then(char::from_u32)
    }

    /// One archive-guided step on a string: either its length or its
    /// focused character changes.
    pub fn mutate_string(&self, gene: &mut StringGene, randomness: &mut Randomness) -> Result<()> {
        let chars_open = self.has_open_char(gene);
        let length_open = !gene.length_mutation.reached;

        let mutate_length =
            length_open && (!chars_open || randomness.next_boolean(self.config.length_mutation_probability));

        if mutate_length && self.mutate_length(gene, randomness) {
            gene.repair();
            return Ok(());
        }

        if chars_open {
            self.mutate_char(gene, randomness)?;
            gene.repair();
        } else {
            trace!("string gene {} has no open dimension", gene.name());
        }
        Ok(())
    }

    fn has_open_char(&self, gene: &StringGene) -> bool {
        let len = gene.value().chars().count();
        if len == 0 {
            return false;
        }
        if gene.mutated_index.is_none() {
            return true;
        }
        if self.relax_index_string_gene_mutation() {
            return gene.chars_mutation.first().map_or(true, |t| !t.reached);
        }
        self.next_open_index(gene, len).is_some()
    }

    fn next_open_index(&self, gene: &StringGene, len: usize) -> Option<usize> {
        let start = gene.mutated_index.unwrap_or(0);
        (start..len).find(|&i| gene.chars_mutation.get(i).map_or(true, |t| !t.reached))
    }

    fn mutate_length(&self, gene: &mut StringGene, randomness: &mut Randomness) -> bool {
        let mut chars: Vec<char> = gene.value().chars().collect();
        let tracker = &gene.length_mutation;
        let min = tracker.prefer_min.max(gene.min_length() as i64);
        let max = tracker.prefer_max.min(gene.max_length() as i64);
        let current = chars.len() as i64;

        let Some(target) = self.sample(min, max, |v| v != current, randomness) else {
            gene.length_mutation.reached = true;
            return false;
        };

        let target = target as usize;
        if target > chars.len() {
            while chars.len() < target {
                chars.push(randomness.next_word_char());
            }
        } else {
            chars.truncate(target);
        }

        gene.length_mutation.counter += 1;
        trace!("string gene {}: length {} -> {}", gene.name(), current, target);
        gene.set_plain_value(chars.into_iter().collect());
        true
    }

    fn mutate_char(&self, gene: &mut StringGene, randomness: &mut Randomness) -> Result<()> {
        let mut chars: Vec<char> = gene.value().chars().collect();
        if chars.is_empty() {
            return Ok(());
        }
        if gene.mutated_index.is_none() {
            gene.init_char_mutation();
            gene.mutated_index = Some(0);
        }
        if gene.chars_mutation.len() != chars.len() {
            gene.chars_mutation.resize_with(chars.len(), char_tracker);
        }

        let relaxed = self.relax_index_string_gene_mutation();
        let index = if relaxed {
            randomness.next_int(chars.len())?
        } else {
            match self.next_open_index(gene, chars.len()) {
                Some(index) => index,
                None => return Ok(()),
            }
        };
        gene.mutated_index = Some(index);

        let mut exclude: Vec<u32> = gene.invalid_chars().iter().map(|&c| c as u32).collect();
        exclude.push(chars[index] as u32);

        let slot = if relaxed { 0 } else { index };
        let tracker = &mut gene.chars_mutation[slot];
        tracker.counter += 1;
        match self.sample_code_point(tracker.prefer_min, tracker.prefer_max, &exclude, randomness) {
            Some(c) => {
                chars[index] = c;
                gene.set_plain_value(chars.into_iter().collect());
            }
            None => tracker.reached = true,
        }
        Ok(())
    }

    /// Sample a new integer inside the preferred interval. Returns false and
    /// closes the dimension when nothing new is left.
    pub fn mutate_integer(&self, gene: &mut IntegerGene, randomness: &mut Randomness) -> bool {
        let tracker = &gene.value_mutation;
        let min = tracker.prefer_min.max(gene.min() as i64);
        let max = tracker.prefer_max.min(gene.max() as i64);
        let current = gene.value() as i64;

        match self.sample(min, max, |v| v != current, randomness) {
            Some(value) => {
                gene.value_mutation.counter += 1;
                gene.set_sampled(value);
                true
            }
            None => {
                gene.value_mutation.reached = true;
                false
            }
        }
    }
}
