use super::gene::Gene;
use crate::engines::search::impact::ImpactLookup;
use crate::engines::search::randomness::Randomness;
use crate::engines::search::SearchServices;
use crate::error::{GeneError, Result};
use crate::types::{OutputFormat, RenderMode};

/// Ordered genes of one test case. The order is the dependency order, eg
/// the order in which SQL rows get inserted.
#[derive(Debug, Clone, Default)]
pub struct Individual {
    genes: Vec<Gene>,
}

impl Individual {
    pub fn new(genes: Vec<Gene>) -> Self {
        Self { genes }
    }

    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    pub fn gene(&self, index: usize) -> Option<&Gene> {
        self.genes.get(index)
    }

    pub fn push(&mut self, gene: Gene) {
        self.genes.push(gene);
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Run `f` on a copy of gene `index`, with the whole individual as
    /// context, and store the copy back only if `f` succeeds
    fn with_gene_at<F>(&mut self, index: usize, f: F) -> Result<()>
    where
        F: FnOnce(&mut Gene, &[Gene]) -> Result<()>,
    {
        let mut gene = self
            .genes
            .get(index)
            .cloned()
            .ok_or(GeneError::GeneIndexOutOfBounds(index))?;
        f(&mut gene, &self.genes)?;
        self.genes[index] = gene;
        Ok(())
    }

    /// Randomize every gene in dependency order
    pub fn randomize(&mut self, randomness: &mut Randomness) -> Result<()> {
        for index in 0..self.genes.len() {
            self.with_gene_at(index, |gene, context| {
                gene.randomize_in_context(randomness, false, context)
            })?;
        }
        Ok(())
    }

    pub fn standard_mutation(&mut self, index: usize, services: &mut SearchServices) -> Result<()> {
        self.with_gene_at(index, |gene, context| gene.standard_mutation(services, context))
    }

    /// Archive-guided mutation of gene `index`. Returns the gene as it was
    /// before, to be handed back to [`Individual::archive_feedback`].
    pub fn archive_mutation(
        &mut self,
        index: usize,
        services: &mut SearchServices,
        impacts: &dyn ImpactLookup,
    ) -> Result<Gene> {
        let original = self
            .genes
            .get(index)
            .cloned()
            .ok_or(GeneError::GeneIndexOutOfBounds(index))?;
        self.with_gene_at(index, |gene, context| {
            gene.archive_mutation(services, context, None, impacts)
        })?;
        Ok(original)
    }

    pub fn archive_feedback(
        &mut self,
        index: usize,
        original: &Gene,
        does_current_better: bool,
        services: &SearchServices,
    ) -> Result<()> {
        let gene = self
            .genes
            .get_mut(index)
            .ok_or(GeneError::GeneIndexOutOfBounds(index))?;
        let mutated = gene.clone();
        gene.archive_mutation_update(original, &mutated, does_current_better, &services.archive)
    }

    /// Printable value of every gene, each rendered against its predecessors
    pub fn render(&self, mode: RenderMode, target: Option<OutputFormat>) -> Result<Vec<String>> {
        self.genes
            .iter()
            .enumerate()
            .map(|(i, gene)| gene.value_as_printable_string(&self.genes[..i], mode, target))
            .collect()
    }

    pub fn reach_optimal(&self) -> bool {
        self.genes.iter().all(|g| g.reach_optimal())
    }
}
