use super::traits::{check_probability, ConfigManifest, ConfigSection, FieldManifest};
use crate::error::GeneError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MutationConfig {
    /// Taint seeding probability at the start of the search
    pub taint_probability_start: f64,
    /// Taint seeding probability once focused search is active
    pub taint_probability_end: f64,
    /// Max exponent of the character delta at the start of the search
    pub delta_start: u32,
    pub delta_end: u32,
    /// Fraction of the budget after which parameters reach their end values
    pub focused_search_activation: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            taint_probability_start: 0.9,
            taint_probability_end: 0.0,
            delta_start: 6,
            delta_end: 3,
            focused_search_activation: 0.5,
        }
    }
}

impl ConfigSection for MutationConfig {
    fn section_name() -> &'static str {
        "mutation"
    }

    fn validate(&self) -> Result<(), GeneError> {
        check_probability("taint_probability_start", self.taint_probability_start)?;
        check_probability("taint_probability_end", self.taint_probability_end)?;
        check_probability("focused_search_activation", self.focused_search_activation)?;
        if self.delta_start == 0 || self.delta_end == 0 {
            return Err(GeneError::Configuration(
                "Delta weights must be positive".to_string(),
            ));
        }
        if self.delta_start > 30 || self.delta_end > 30 {
            return Err(GeneError::Configuration(
                "Delta weights must not exceed 30".to_string(),
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Mutation".to_string(),
            fields: vec![
                FieldManifest::new(
                    "taint_probability_start",
                    "float",
                    json!(0.9),
                    Some((0.0, 1.0)),
                    "Probability of seeding a taint marker early in the search",
                ),
                FieldManifest::new(
                    "taint_probability_end",
                    "float",
                    json!(0.0),
                    Some((0.0, 1.0)),
                    "Probability of seeding a taint marker during focused search",
                ),
                FieldManifest::new(
                    "delta_start",
                    "integer",
                    json!(6),
                    Some((1.0, 30.0)),
                    "Upper bound of the delta exponent early in the search",
                ),
                FieldManifest::new(
                    "delta_end",
                    "integer",
                    json!(3),
                    Some((1.0, 30.0)),
                    "Upper bound of the delta exponent during focused search",
                ),
                FieldManifest::new(
                    "focused_search_activation",
                    "float",
                    json!(0.5),
                    Some((0.0, 1.0)),
                    "Budget fraction at which focused search starts",
                ),
            ],
        }
    }
}
