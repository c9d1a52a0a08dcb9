use super::traits::{check_probability, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::GeneError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    /// Share one character tracker across all positions instead of one per index
    pub relax_index_string_mutation: bool,
    pub length_mutation_probability: f64,
    pub candidate_sample_attempts: usize,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            relax_index_string_mutation: false,
            length_mutation_probability: 0.5,
            candidate_sample_attempts: 16,
        }
    }
}

impl ConfigSection for ArchiveConfig {
    fn section_name() -> &'static str {
        "archive"
    }

    fn validate(&self) -> Result<(), GeneError> {
        check_probability("length_mutation_probability", self.length_mutation_probability)?;
        if self.candidate_sample_attempts == 0 {
            return Err(GeneError::Configuration(
                "candidate_sample_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Archive".to_string(),
            fields: vec![
                FieldManifest::new(
                    "relax_index_string_mutation",
                    "bool",
                    json!(false),
                    None,
                    "Use a single shared character tracker",
                ),
                FieldManifest::new(
                    "length_mutation_probability",
                    "float",
                    json!(0.5),
                    Some((0.0, 1.0)),
                    "Chance of mutating the length while both dimensions are open",
                ),
                FieldManifest::new(
                    "candidate_sample_attempts",
                    "integer",
                    json!(16),
                    Some((1.0, 1024.0)),
                    "Random draws before scanning the interval for a candidate",
                ),
            ],
        }
    }
}
