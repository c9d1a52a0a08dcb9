use crate::engines::genes::Gene;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How often mutating one gene changed the fitness of its individual
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneImpact {
    pub id: String,
    pub times_to_manipulate: u32,
    pub times_of_impact: u32,
    pub times_of_no_impact: u32,
}

impl GeneImpact {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn count_manipulation(&mut self, has_impact: bool) {
        self.times_to_manipulate += 1;
        if has_impact {
            self.times_of_impact += 1;
        } else {
            self.times_of_no_impact += 1;
        }
    }
}

/// Impact records of the genes of one evaluated individual
pub trait ImpactLookup {
    fn impact_of(&self, gene_id: &str) -> Option<&GeneImpact>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImpactArchive {
    impacts: HashMap<String, GeneImpact>,
}

impl ImpactArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of mutating `gene`
    pub fn record(&mut self, gene: &Gene, has_impact: bool) {
        let id = generate_gene_id(gene);
        self.impacts
            .entry(id.clone())
            .or_insert_with(|| GeneImpact::new(id))
            .count_manipulation(has_impact);
    }

    pub fn len(&self) -> usize {
        self.impacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.impacts.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl ImpactLookup for ImpactArchive {
    fn impact_of(&self, gene_id: &str) -> Option<&GeneImpact> {
        self.impacts.get(gene_id)
    }
}

/// Identifier of a gene within its individual
pub fn generate_gene_id(gene: &Gene) -> String {
    gene_id(gene.kind(), gene.name())
}

pub(crate) fn gene_id(kind: &str, name: &str) -> String {
    format!("{}:{}", kind, name)
}
