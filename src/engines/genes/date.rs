use super::number::IntegerGene;
use crate::engines::search::adaptive::AdaptiveParameterControl;
use crate::engines::search::randomness::Randomness;
use chrono::{Datelike, NaiveDate};

/// Calendar date rendered as `YYYY-MM-DD`. Mutation moves one field at a
/// time and the day is then pulled back into the month.
#[derive(Debug, Clone)]
pub struct DateGene {
    name: String,
    year: IntegerGene,
    month: IntegerGene,
    day: IntegerGene,
}

impl DateGene {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            year: IntegerGene::new("year", 2016).with_bounds(1900, 2100),
            month: IntegerGene::new("month", 3).with_bounds(1, 12),
            day: IntegerGene::new("day", 12).with_bounds(1, 31),
            name,
        }
    }

    pub fn from_date(name: impl Into<String>, date: NaiveDate) -> Self {
        let mut gene = Self::new(name);
        gene.year.set_value(date.year());
        gene.month.set_value(date.month() as i32);
        gene.day.set_value(date.day() as i32);
        gene.repair();
        gene
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(
            self.year.value(),
            self.month.value() as u32,
            self.day.value() as u32,
        )
    }

    pub fn randomize(&mut self, randomness: &mut Randomness, force_new_value: bool) {
        self.year.randomize(randomness, force_new_value);
        self.month.randomize(randomness, force_new_value);
        self.day.randomize(randomness, force_new_value);
        self.repair();
    }

    pub fn standard_mutation(&mut self, randomness: &mut Randomness, apc: &AdaptiveParameterControl) {
        match randomness.next_int_between(0, 2) {
            0 => self.year.standard_mutation(randomness, apc),
            1 => self.month.standard_mutation(randomness, apc),
            _ => self.day.standard_mutation(randomness, apc),
        }
        self.repair();
    }

    /// Clamp the day to the last day of the month
    fn repair(&mut self) {
        while self.day.value() > 28 && self.to_naive_date().is_none() {
            self.day.set_value(self.day.value() - 1);
        }
    }

    pub fn value_as_raw_string(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.year.value(),
            self.month.value(),
            self.day.value()
        )
    }

    pub fn value_as_printable_string(&self) -> String {
        format!("\"{}\"", self.value_as_raw_string())
    }

    pub fn copy_value_from(&mut self, other: &DateGene) {
        self.year.copy_value_from(&other.year);
        self.month.copy_value_from(&other.month);
        self.day.copy_value_from(&other.day);
    }

    pub fn contains_same_value_as(&self, other: &DateGene) -> bool {
        self.value_as_raw_string() == other.value_as_raw_string()
    }
}
