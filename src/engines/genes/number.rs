use super::gene::get_delta;
use super::tracker::IntervalTracker;
use crate::engines::search::adaptive::AdaptiveParameterControl;
use crate::engines::search::archive::ArchiveMutator;
use crate::engines::search::randomness::Randomness;

/// Below this many legal values, mutation just samples uniformly
const SMALL_RANGE: i64 = 16;

#[derive(Debug, Clone)]
pub struct IntegerGene {
    name: String,
    value: i32,
    min: i32,
    max: i32,
    pub(crate) value_mutation: IntervalTracker,
}

impl IntegerGene {
    pub fn new(name: impl Into<String>, value: i32) -> Self {
        Self {
            name: name.into(),
            value,
            min: i32::MIN,
            max: i32::MAX,
            value_mutation: IntervalTracker::new(i32::MIN as i64, i32::MAX as i64),
        }
    }

    /// Inclusive bounds, the value is clamped into them
    pub fn with_bounds(mut self, min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min = min;
        self.max = max;
        self.value = self.value.clamp(min, max);
        self.value_mutation = IntervalTracker::new(min as i64, max as i64);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = value.clamp(self.min, self.max);
    }

    pub fn value_mutation(&self) -> &IntervalTracker {
        &self.value_mutation
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    fn range(&self) -> i64 {
        self.max as i64 - self.min as i64
    }

    pub fn randomize(&mut self, randomness: &mut Randomness, force_new_value: bool) {
        if force_new_value && self.range() == 0 {
            return;
        }
        loop {
            let candidate = randomness.next_int_between(self.min as i64, self.max as i64) as i32;
            if !force_new_value || candidate != self.value {
                self.value = candidate;
                return;
            }
        }
    }

    pub fn standard_mutation(&mut self, randomness: &mut Randomness, apc: &AdaptiveParameterControl) {
        if self.range() < SMALL_RANGE {
            self.randomize(randomness, true);
            return;
        }

        let delta = get_delta(randomness, apc, self.range());
        let sign = if randomness.coin() { 1 } else { -1 };
        let mut shifted = self.value as i64 + sign * delta;
        if shifted > self.max as i64 || shifted < self.min as i64 {
            shifted = self.value as i64 - sign * delta;
        }
        self.value = shifted.clamp(self.min as i64, self.max as i64) as i32;
    }

    /// Sample inside the preferred interval, falling back to blind mutation
    /// once the interval has nothing new to offer
    pub fn archive_mutation(
        &mut self,
        archive: &ArchiveMutator,
        randomness: &mut Randomness,
        apc: &AdaptiveParameterControl,
    ) {
        if !archive.mutate_integer(self, randomness) {
            self.standard_mutation(randomness, apc);
        }
    }

    pub fn archive_mutation_update(&mut self, original: &IntegerGene, mutated: &IntegerGene, does_current_better: bool) {
        if original.value == mutated.value {
            return;
        }
        self.value_mutation
            .apply_feedback(original.value as i64, mutated.value as i64, does_current_better);
    }

    pub fn reach_optimal(&self) -> bool {
        self.value_mutation.reached
    }

    pub fn value_as_raw_string(&self) -> String {
        self.value.to_string()
    }

    pub fn copy_value_from(&mut self, other: &IntegerGene) {
        self.value = other.value;
    }

    pub(crate) fn set_sampled(&mut self, value: i64) {
        self.value = value.clamp(self.min as i64, self.max as i64) as i32;
    }
}
