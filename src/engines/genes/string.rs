use super::date::DateGene;
use super::enumeration::EnumGene;
use super::gene::{get_delta, Gene};
use super::number::IntegerGene;
use super::printing::string_literal;
use super::tracker::{Feedback, IntervalTracker};
use crate::engines::search::archive::ArchiveMutator;
use crate::engines::search::impact::{gene_id, GeneImpact, ImpactLookup};
use crate::engines::search::randomness::Randomness;
use crate::engines::search::taint::is_taint_input;
use crate::engines::search::SearchServices;
use crate::error::{GeneError, Result};
use crate::types::{OutputFormat, RenderMode, StringSpecialization, StringSpecializationInfo};
use log::{debug, trace};

/// Strings sampled by randomization stay short, even if mutation can grow them
const MAX_LENGTH_FOR_RANDOMIZATION: usize = 16;

/// Code point range a character tracker starts from
pub(crate) const CHAR_MIN: i64 = 0;
pub(crate) const CHAR_MAX: i64 = 0xFFFF;

const SEEDING_PROBABILITY: f64 = 0.02;
const CHANGE_PROBABILITY: f64 = 0.8;
const DELETE_PROBABILITY: f64 = 0.9;
const APPEND_PROBABILITY: f64 = 0.8;

/// Once a specialization is chosen it owns rendering and mutation, and the
/// base string is left untouched.
#[derive(Debug, Clone)]
pub enum StringValue {
    Plain(String),
    Specialized { base: String, gene: Box<Gene> },
}

#[derive(Debug, Clone)]
pub struct StringGene {
    name: String,
    value: StringValue,
    min_length: usize,
    max_length: usize,
    invalid_chars: Vec<char>,
    specializations: Vec<StringSpecializationInfo>,
    /// Replacement for invalid chars, fixed by `invalid_chars`
    substitute: Option<char>,
    /// Character currently focused by archive mutation, `None` until the
    /// character trackers are initialized
    pub(crate) mutated_index: Option<usize>,
    pub(crate) chars_mutation: Vec<IntervalTracker>,
    pub(crate) length_mutation: IntervalTracker,
}

impl StringGene {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: StringValue::Plain(value.into()),
            min_length: 0,
            max_length: 16,
            invalid_chars: Vec::new(),
            specializations: Vec::new(),
            substitute: None,
            mutated_index: None,
            chars_mutation: Vec::new(),
            length_mutation: IntervalTracker::new(0, 16),
        }
    }

    /// Inclusive length bounds. A `max_length` below `min_length` is raised to
    /// it. A value outside the bounds is brought back by the next [`repair`].
    ///
    /// [`repair`]: StringGene::repair
    pub fn with_bounds(mut self, min_length: usize, max_length: usize) -> Self {
        self.min_length = min_length;
        self.max_length = max_length.max(min_length);
        self.length_mutation = IntervalTracker::new(self.min_length as i64, self.max_length as i64);
        self
    }

    pub fn with_invalid_chars(mut self, invalid_chars: impl IntoIterator<Item = char>) -> Self {
        self.invalid_chars = invalid_chars.into_iter().collect();
        self.substitute = valid_substitute(&self.invalid_chars);
        self
    }

    pub fn with_specializations(mut self, specializations: Vec<StringSpecializationInfo>) -> Self {
        self.specializations = specializations;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The base string. Frozen once a specialization took over.
    pub fn value(&self) -> &str {
        match &self.value {
            StringValue::Plain(value) => value,
            StringValue::Specialized { base, .. } => base,
        }
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        match &mut self.value {
            StringValue::Plain(current) => *current = value.into(),
            StringValue::Specialized { base, .. } => *base = value.into(),
        }
    }

    pub fn state(&self) -> &StringValue {
        &self.value
    }

    pub fn specialization_gene(&self) -> Option<&Gene> {
        match &self.value {
            StringValue::Plain(_) => None,
            StringValue::Specialized { gene, .. } => Some(gene),
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn invalid_chars(&self) -> &[char] {
        &self.invalid_chars
    }

    pub fn specializations(&self) -> &[StringSpecializationInfo] {
        &self.specializations
    }

    pub fn mutated_index(&self) -> Option<usize> {
        self.mutated_index
    }

    pub fn chars_mutation(&self) -> &[IntervalTracker] {
        &self.chars_mutation
    }

    pub fn length_mutation(&self) -> &IntervalTracker {
        &self.length_mutation
    }

    pub fn randomize(&mut self, randomness: &mut Randomness) {
        let max = self.max_length.min(MAX_LENGTH_FOR_RANDOMIZATION);
        self.value = StringValue::Plain(randomness.next_word_string(self.min_length, max));
        self.repair();
    }

    pub fn standard_mutation(&mut self, services: &mut SearchServices, all_genes: &[Gene]) -> Result<()> {
        self.ensure_specialization()?;

        if let StringValue::Specialized { gene, .. } = &mut self.value {
            return gene.standard_mutation(services, all_genes);
        }

        if self.try_seed_taint(services) {
            return Ok(());
        }

        let current = self.value().to_string();
        let mut chars: Vec<char> = current.chars().collect();
        let randomness = &mut services.randomness;
        let p = randomness.next_double();

        // Other strings of the individual, as long as they fit this gene
        let others: Vec<String> = all_genes
            .iter()
            .flat_map(|g| g.flat_view())
            .filter_map(|g| match g {
                Gene::String(s) => Some(s.value().to_string()),
                _ => None,
            })
            .filter(|v| *v != current && self.fits_length(v.chars().count()))
            .collect();

        let mutated = if p < SEEDING_PROBABILITY && !others.is_empty() {
            trace!("string gene {}: seeding from another gene", self.name);
            randomness.choose(&others)?
        } else if p < CHANGE_PROBABILITY && !chars.is_empty() {
            let delta = get_delta(randomness, &services.apc, CHAR_MAX);
            let sign = if randomness.coin() { 1 } else { -1 };
            let i = randomness.next_int(chars.len())?;
            chars[i] = shift_char(chars[i], sign * delta);
            chars.into_iter().collect()
        } else if p < DELETE_PROBABILITY && !chars.is_empty() && chars.len() > self.min_length {
            chars.pop();
            chars.into_iter().collect()
        } else if chars.len() < self.max_length {
            let c = randomness.next_word_char();
            if chars.is_empty() || randomness.next_boolean(APPEND_PROBABILITY) {
                chars.push(c);
            } else {
                let i = randomness.next_int(chars.len())?;
                chars.insert(i, c);
            }
            chars.into_iter().collect()
        } else {
            current
        };

        self.value = StringValue::Plain(mutated);
        self.repair();
        Ok(())
    }

    /// Replace the value by a fresh taint marker, unless it already is one.
    /// A marker that would break the length bounds or contain an invalid
    /// char is discarded.
    fn try_seed_taint(&mut self, services: &mut SearchServices) -> bool {
        if is_taint_input(self.value()) {
            return false;
        }
        let probability = services.apc.base_taint_analysis_probability();
        if !services.randomness.next_boolean(probability) {
            return false;
        }

        let marker = services.taint.next_taint_name();
        if !self.fits_length(marker.chars().count())
            || marker.chars().any(|c| self.invalid_chars.contains(&c))
        {
            return false;
        }

        debug!("string gene {}: seeding taint marker {}", self.name, marker);
        self.value = StringValue::Plain(marker);
        true
    }

    fn fits_length(&self, len: usize) -> bool {
        (self.min_length..=self.max_length).contains(&len)
    }

    fn ensure_specialization(&mut self) -> Result<()> {
        if matches!(self.value, StringValue::Plain(_)) && !self.specializations.is_empty() {
            self.choose_specialization()?;
        }
        Ok(())
    }

    /// Dates win over integers, which win over constants
    fn choose_specialization(&mut self) -> Result<()> {
        let has = |kind: StringSpecialization| {
            self.specializations.iter().any(|s| s.specialization == kind)
        };

        let gene = if has(StringSpecialization::DateYyyyMmDd) {
            Gene::Date(DateGene::new(self.name.clone()))
        } else if has(StringSpecialization::Integer) {
            Gene::Integer(IntegerGene::new(self.name.clone(), 0))
        } else if has(StringSpecialization::Constant) {
            let mut constants: Vec<String> = Vec::new();
            for info in &self.specializations {
                if info.specialization == StringSpecialization::Constant
                    && !constants.contains(&info.value)
                {
                    constants.push(info.value.clone());
                }
            }
            Gene::Enum(EnumGene::new(self.name.clone(), constants)?)
        } else {
            let kinds: Vec<_> = self.specializations.iter().map(|s| s.specialization).collect();
            return Err(GeneError::UnsupportedSpecialization(format!("{:?}", kinds)));
        };

        debug!("string gene {}: specialized as {}", self.name, gene.kind());
        let base = std::mem::take(match &mut self.value {
            StringValue::Plain(value) => value,
            StringValue::Specialized { base, .. } => base,
        });
        self.value = StringValue::Specialized {
            base,
            gene: Box::new(gene),
        };
        Ok(())
    }

    /// Truncate or pad the value into the length bounds, then replace every
    /// invalid char with the first valid letter
    pub fn repair(&mut self) {
        let (min_length, max_length) = (self.min_length, self.max_length);
        let padding = self.substitute.or_else(|| valid_substitute(&self.invalid_chars));
        let invalid = &self.invalid_chars;
        let target = match &mut self.value {
            StringValue::Plain(value) => value,
            StringValue::Specialized { base, .. } => base,
        };

        let len = target.chars().count();
        if len > max_length {
            *target = target.chars().take(max_length).collect();
        } else if len < min_length {
            if let Some(pad) = padding {
                target.extend(std::iter::repeat(pad).take(min_length - len));
            }
        }

        let Some(substitute) = self.substitute else {
            return;
        };
        if target.chars().any(|c| invalid.contains(&c)) {
            *target = target
                .chars()
                .map(|c| if invalid.contains(&c) { substitute } else { c })
                .collect();
        }
    }

    pub fn archive_mutation(
        &mut self,
        services: &mut SearchServices,
        all_genes: &[Gene],
        impact: Option<&GeneImpact>,
        impacts: &dyn ImpactLookup,
    ) -> Result<()> {
        self.ensure_specialization()?;

        if let StringValue::Specialized { gene, .. } = &mut self.value {
            let impact = match impact {
                Some(impact) => impact,
                None => {
                    let id = gene_id("StringGene", &self.name);
                    impacts.impact_of(&id).ok_or(GeneError::MissingImpact(id))?
                }
            };
            return gene.archive_mutation(services, all_genes, Some(impact), impacts);
        }

        let SearchServices {
            archive, randomness, ..
        } = services;
        archive.mutate_string(self, randomness)
    }

    pub fn reach_optimal(&self) -> bool {
        if let StringValue::Specialized { gene, .. } = &self.value {
            return gene.reach_optimal();
        }
        self.length_mutation.reached && self.chars_mutation.iter().all(|t| t.reached)
    }

    /// Route feedback to the length tracker when the mutation changed the
    /// length, otherwise to the tracker of the focused character
    pub fn archive_mutation_update(
        &mut self,
        original: &StringGene,
        mutated: &StringGene,
        does_current_better: bool,
        archive: &ArchiveMutator,
    ) -> Result<()> {
        if let (
            StringValue::Specialized { gene, .. },
            Some(original_gene),
            Some(mutated_gene),
        ) = (
            &mut self.value,
            original.specialization_gene(),
            mutated.specialization_gene(),
        ) {
            return gene.archive_mutation_update(original_gene, mutated_gene, does_current_better, archive);
        }

        // Specialized during this step, the base value is frozen from now on
        if self.specialization_gene().is_some() {
            return Ok(());
        }

        let previous: Vec<char> = original.value().chars().collect();
        let current: Vec<char> = mutated.value().chars().collect();

        if previous.len() != current.len() {
            self.length_mutation.reached = mutated.length_mutation.reached;
            self.length_update(previous.len(), current.len(), does_current_better, archive);
        } else {
            if self.mutated_index.is_none() {
                self.init_char_mutation();
            }
            let index = mutated.mutated_index.or(self.mutated_index).unwrap_or(0);
            self.mutated_index = Some(index);
            self.char_update(&previous, &current, mutated, does_current_better, archive);
        }
        Ok(())
    }

    fn length_update(&mut self, previous: usize, current: usize, does_current_better: bool, archive: &ArchiveMutator) {
        let len = self.value().chars().count();
        self.chars_mutation.resize_with(len, char_tracker);

        let feedback = self
            .length_mutation
            .apply_feedback(previous as i64, current as i64, does_current_better);
        if feedback == Feedback::Reset {
            debug!("string gene {}: length tracker reset", self.name);
            return;
        }

        // An empty string has no character to mutate, so the character
        // dimension is closed as well
        if self.length_mutation.reached && len == 0 && !archive.relax_index_string_gene_mutation() {
            if self.chars_mutation.is_empty() {
                self.chars_mutation.push(char_tracker());
            }
            self.chars_mutation[0].reached = true;
            self.mutated_index = Some(0);
        }
    }

    fn char_update(
        &mut self,
        previous: &[char],
        current: &[char],
        mutated: &StringGene,
        does_current_better: bool,
        archive: &ArchiveMutator,
    ) {
        let relaxed = archive.relax_index_string_gene_mutation();
        let Some(index) = self.mutated_index else {
            return;
        };
        let own: Vec<char> = self.value().chars().collect();
        if index >= previous.len() || index >= own.len() {
            return;
        }
        if self.chars_mutation.len() != own.len() {
            self.chars_mutation.resize_with(own.len(), char_tracker);
        }

        let slot = if relaxed { 0 } else { index };
        if let Some(source) = mutated.chars_mutation.get(slot) {
            self.chars_mutation[slot].reached = source.reached;
        }

        let mut exclude: Vec<u32> = self.invalid_chars.iter().map(|&c| c as u32).collect();
        exclude.push(own[index] as u32);

        let tracker = &mut self.chars_mutation[slot];
        let feedback = tracker.apply_feedback(previous[index] as i64, current[index] as i64, does_current_better);
        if feedback == Feedback::Reset {
            debug!("string gene {}: char tracker {} reset", self.name, slot);
            return;
        }

        if archive.check_if_has_candidates(tracker.prefer_min, tracker.prefer_max, &exclude) {
            return;
        }

        tracker.reached = true;
        if !relaxed {
            self.mutated_index = Some(index + 1);
            if let Some(next) = self.chars_mutation.get_mut(index + 1) {
                archive.reset_char_mutation_update(next);
            }
        }
    }

    pub(crate) fn init_char_mutation(&mut self) {
        let len = self.value().chars().count();
        self.chars_mutation.clear();
        self.chars_mutation.resize_with(len, char_tracker);
    }

    pub(crate) fn set_plain_value(&mut self, value: String) {
        self.value = StringValue::Plain(value);
    }

    pub fn value_as_printable_string(&self, mode: RenderMode, target: Option<OutputFormat>) -> Result<String> {
        Ok(string_literal(&self.value_as_raw_string()?, mode, target))
    }

    pub fn value_as_raw_string(&self) -> Result<String> {
        match &self.value {
            StringValue::Plain(value) => Ok(value.clone()),
            StringValue::Specialized { gene, .. } => gene.value_as_raw_string(),
        }
    }

    pub fn copy_value_from(&mut self, other: &StringGene) -> Result<()> {
        let replacement = match (&mut self.value, &other.value) {
            (
                StringValue::Specialized { base, gene },
                StringValue::Specialized {
                    base: other_base,
                    gene: other_gene,
                },
            ) if gene.kind() == other_gene.kind() => {
                *base = other_base.clone();
                gene.copy_value_from(other_gene)?;
                None
            }
            _ => Some(other.value.clone()),
        };

        if let Some(value) = replacement {
            self.value = value;
        }
        Ok(())
    }

    pub fn contains_same_value_as(&self, other: &StringGene) -> Result<bool> {
        match (&self.value, &other.value) {
            (StringValue::Plain(a), StringValue::Plain(b)) => Ok(a == b),
            (StringValue::Specialized { gene: a, .. }, StringValue::Specialized { gene: b, .. }) => {
                if a.kind() != b.kind() {
                    return Ok(false);
                }
                a.contains_same_value_as(b)
            }
            _ => Ok(false),
        }
    }
}

pub(crate) fn char_tracker() -> IntervalTracker {
    IntervalTracker::new(CHAR_MIN, CHAR_MAX)
}

/// First letter (lowercase, then uppercase, then digit) that is not invalid
fn valid_substitute(invalid_chars: &[char]) -> Option<char> {
    ('a'..='z')
        .chain('A'..='Z')
        .chain('0'..='9')
        .find(|c| !invalid_chars.contains(c))
}

/// Shift a code point by `delta`, wrapping within the basic plane and
/// stepping over the surrogate block
fn shift_char(c: char, delta: i64) -> char {
    let mut code = (c as i64 + delta).rem_euclid(CHAR_MAX + 1) as u32;
    if (0xD800..=0xDFFF).contains(&code) {
        code = if delta > 0 { 0xE000 } else { 0xD7FF };
    }
    char::from_u32(code).unwrap_or(c)
}
