pub mod adaptive;
pub mod archive;
pub mod impact;
pub mod randomness;
pub mod taint;

pub use adaptive::AdaptiveParameterControl;
pub use archive::ArchiveMutator;
pub use impact::{generate_gene_id, GeneImpact, ImpactArchive, ImpactLookup};
pub use randomness::Randomness;
pub use taint::{is_taint_input, TaintCounter};

use crate::config::AppConfig;
use std::sync::Arc;

/// Services a mutation call needs. Owned by the search loop and lent to one
/// gene at a time; only the taint counter may be shared between workers.
pub struct SearchServices {
    pub randomness: Randomness,
    pub apc: AdaptiveParameterControl,
    pub archive: ArchiveMutator,
    pub taint: Arc<TaintCounter>,
}

impl SearchServices {
    pub fn from_config(config: &AppConfig) -> Self {
        let taint = TaintCounter::sharded(config.search.worker_index, config.search.worker_count);
        Self::with_taint_counter(config, Arc::new(taint))
    }

    pub fn with_taint_counter(config: &AppConfig, taint: Arc<TaintCounter>) -> Self {
        Self {
            randomness: Randomness::new(config.search.seed),
            apc: AdaptiveParameterControl::new(config.mutation.clone()),
            archive: ArchiveMutator::new(config.archive.clone()),
            taint,
        }
    }
}
