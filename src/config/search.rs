use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::GeneError;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub seed: Option<u64>,
    /// Workers sharing one taint marker space
    pub worker_count: u64,
    pub worker_index: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            worker_count: 1,
            worker_index: 0,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), GeneError> {
        if self.worker_count == 0 {
            return Err(GeneError::Configuration(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.worker_index >= self.worker_count {
            return Err(GeneError::Configuration(format!(
                "worker_index {} out of range for {} workers",
                self.worker_index, self.worker_count
            )));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Search".to_string(),
            fields: vec![
                FieldManifest::new("seed", "integer", json!(null), None, "RNG seed, entropy if unset"),
                FieldManifest::new(
                    "worker_count",
                    "integer",
                    json!(1),
                    Some((1.0, 1024.0)),
                    "Number of workers sharding the taint counter",
                ),
                FieldManifest::new(
                    "worker_index",
                    "integer",
                    json!(0),
                    None,
                    "Shard owned by this worker",
                ),
            ],
        }
    }
}
