use super::printing::string_literal;
use crate::engines::search::randomness::Randomness;
use crate::error::{GeneError, Result};
use crate::types::{OutputFormat, RenderMode};

/// One of a fixed list of string values
#[derive(Debug, Clone)]
pub struct EnumGene {
    name: String,
    values: Vec<String>,
    index: usize,
}

impl EnumGene {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(GeneError::Construction(format!(
                "enum gene '{}' needs at least one value",
                name
            )));
        }
        Ok(Self {
            name,
            values,
            index: 0,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn randomize(&mut self, randomness: &mut Randomness, force_new_value: bool) -> Result<()> {
        if force_new_value && self.values.len() > 1 {
            // Skip over the current index
            let offset = randomness.next_int(self.values.len() - 1)?;
            self.index = (self.index + 1 + offset) % self.values.len();
        } else {
            self.index = randomness.next_int(self.values.len())?;
        }
        Ok(())
    }

    pub fn value_as_raw_string(&self) -> &str {
        &self.values[self.index]
    }

    pub fn value_as_printable_string(&self, mode: RenderMode, target: Option<OutputFormat>) -> String {
        string_literal(self.value_as_raw_string(), mode, target)
    }

    pub fn copy_value_from(&mut self, other: &EnumGene) -> Result<()> {
        match self.values.iter().position(|v| v == other.value_as_raw_string()) {
            Some(index) => {
                self.index = index;
                Ok(())
            }
            None => Err(GeneError::VariantMismatch {
                expected: format!("one of {:?}", self.values),
                actual: other.value_as_raw_string().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_values_rejected() {
        assert!(EnumGene::new("e", vec![]).is_err());
    }

    #[test]
    fn test_forced_randomize_changes_value() {
        let mut randomness = Randomness::seeded(4);
        let mut gene = EnumGene::new("e", vec!["a".into(), "b".into(), "c".into()]).unwrap();
        for _ in 0..50 {
            let before = gene.index();
            gene.randomize(&mut randomness, true).unwrap();
            assert_ne!(before, gene.index());
        }
    }
}
