use super::gene::Gene;
use crate::engines::search::archive::ArchiveMutator;
use crate::engines::search::impact::{GeneImpact, ImpactLookup};
use crate::engines::search::randomness::Randomness;
use crate::engines::search::SearchServices;
use crate::error::{GeneError, Result};
use crate::types::{OutputFormat, RenderMode};
use log::debug;

/// Chance that a bound nullable foreign key is set back to NULL
const NULL_PROBABILITY: f64 = 0.1;

const NULL_LITERAL: &str = "null";

fn check_unique_id(unique_id: i64) -> Result<()> {
    if unique_id < 0 {
        return Err(GeneError::Construction(format!(
            "Negative unique id {}",
            unique_id
        )));
    }
    Ok(())
}

/// Value of a primary key column
#[derive(Debug, Clone)]
pub enum PrimaryKeyValue {
    Assigned(Box<Gene>),
    /// Generated by the database on insertion, so unknown beforehand
    Autogenerated,
}

/// Primary key of one inserted row
#[derive(Debug, Clone)]
pub struct SqlPrimaryKeyGene {
    name: String,
    table_name: String,
    unique_id: i64,
    value: PrimaryKeyValue,
}

impl SqlPrimaryKeyGene {
    pub fn new(name: impl Into<String>, table_name: impl Into<String>, unique_id: i64, gene: Gene) -> Result<Self> {
        check_unique_id(unique_id)?;
        Ok(Self {
            name: name.into(),
            table_name: table_name.into(),
            unique_id,
            value: PrimaryKeyValue::Assigned(Box::new(gene)),
        })
    }

    pub fn autogenerated(name: impl Into<String>, table_name: impl Into<String>, unique_id: i64) -> Result<Self> {
        check_unique_id(unique_id)?;
        Ok(Self {
            name: name.into(),
            table_name: table_name.into(),
            unique_id,
            value: PrimaryKeyValue::Autogenerated,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn unique_id(&self) -> i64 {
        self.unique_id
    }

    pub fn assigned_gene(&self) -> Option<&Gene> {
        match &self.value {
            PrimaryKeyValue::Assigned(gene) => Some(gene),
            PrimaryKeyValue::Autogenerated => None,
        }
    }

    pub fn is_printable(&self) -> bool {
        match &self.value {
            PrimaryKeyValue::Assigned(gene) => gene.is_printable(),
            PrimaryKeyValue::Autogenerated => false,
        }
    }

    pub fn randomize(&mut self, randomness: &mut Randomness, force_new_value: bool) -> Result<()> {
        match &mut self.value {
            PrimaryKeyValue::Assigned(gene) => gene.randomize(randomness, force_new_value),
            PrimaryKeyValue::Autogenerated => Ok(()),
        }
    }

    pub fn randomize_in_context(
        &mut self,
        randomness: &mut Randomness,
        force_new_value: bool,
        all_genes: &[Gene],
    ) -> Result<()> {
        match &mut self.value {
            PrimaryKeyValue::Assigned(gene) => gene.randomize_in_context(randomness, force_new_value, all_genes),
            PrimaryKeyValue::Autogenerated => Ok(()),
        }
    }

    pub fn standard_mutation(&mut self, services: &mut SearchServices, all_genes: &[Gene]) -> Result<()> {
        match &mut self.value {
            PrimaryKeyValue::Assigned(gene) => gene.standard_mutation(services, all_genes),
            PrimaryKeyValue::Autogenerated => Ok(()),
        }
    }

    pub fn archive_mutation(
        &mut self,
        services: &mut SearchServices,
        all_genes: &[Gene],
        impact: Option<&GeneImpact>,
        impacts: &dyn ImpactLookup,
    ) -> Result<()> {
        match &mut self.value {
            PrimaryKeyValue::Assigned(gene) => gene.archive_mutation(services, all_genes, impact, impacts),
            PrimaryKeyValue::Autogenerated => Ok(()),
        }
    }

    pub fn archive_mutation_update(
        &mut self,
        original: &SqlPrimaryKeyGene,
        mutated: &SqlPrimaryKeyGene,
        does_current_better: bool,
        archive: &ArchiveMutator,
    ) -> Result<()> {
        match (&mut self.value, original.assigned_gene(), mutated.assigned_gene()) {
            (PrimaryKeyValue::Assigned(gene), Some(original), Some(mutated)) => {
                gene.archive_mutation_update(original, mutated, does_current_better, archive)
            }
            _ => Ok(()),
        }
    }

    pub fn reach_optimal(&self) -> bool {
        match &self.value {
            PrimaryKeyValue::Assigned(gene) => gene.reach_optimal(),
            PrimaryKeyValue::Autogenerated => true,
        }
    }

    pub fn value_as_printable_string(
        &self,
        previous_genes: &[Gene],
        mode: RenderMode,
        target: Option<OutputFormat>,
    ) -> Result<String> {
        match &self.value {
            PrimaryKeyValue::Assigned(gene) => gene.value_as_printable_string(previous_genes, mode, target),
            PrimaryKeyValue::Autogenerated => Err(GeneError::NotPrintable(self.name.clone())),
        }
    }

    pub fn value_as_raw_string(&self) -> Result<String> {
        match &self.value {
            PrimaryKeyValue::Assigned(gene) => gene.value_as_raw_string(),
            PrimaryKeyValue::Autogenerated => Err(GeneError::NotPrintable(self.name.clone())),
        }
    }

    pub fn copy_value_from(&mut self, other: &SqlPrimaryKeyGene) -> Result<()> {
        match (&mut self.value, &other.value) {
            (PrimaryKeyValue::Assigned(gene), PrimaryKeyValue::Assigned(other)) => gene.copy_value_from(other),
            (PrimaryKeyValue::Autogenerated, PrimaryKeyValue::Autogenerated) => Ok(()),
            _ => Err(GeneError::VariantMismatch {
                expected: format!("primary key like {}", self.name),
                actual: other.name.clone(),
            }),
        }
    }

    pub fn contains_same_value_as(&self, other: &SqlPrimaryKeyGene) -> Result<bool> {
        match (&self.value, &other.value) {
            (PrimaryKeyValue::Assigned(gene), PrimaryKeyValue::Assigned(other)) => gene.contains_same_value_as(other),
            (PrimaryKeyValue::Autogenerated, PrimaryKeyValue::Autogenerated) => Ok(self.unique_id == other.unique_id),
            _ => Ok(false),
        }
    }
}

/// What a foreign key currently points to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForeignKeyBinding {
    /// NULL for nullable keys, otherwise not yet randomized
    Unbound,
    /// Unique id of a primary key gene inserted before this one
    Bound(i64),
}

/// A foreign key column of an inserted row.
///
/// Rows are inserted in gene order, so a foreign key may only reference a
/// primary key of its target table that appears earlier in the individual.
/// The actual key value might not even be known before insertion, when the
/// database autogenerates it.
#[derive(Debug, Clone)]
pub struct SqlForeignKeyGene {
    source_column: String,
    unique_id: i64,
    target_table: String,
    nullable: bool,
    binding: ForeignKeyBinding,
}

impl SqlForeignKeyGene {
    pub fn new(
        source_column: impl Into<String>,
        unique_id: i64,
        target_table: impl Into<String>,
        nullable: bool,
    ) -> Result<Self> {
        check_unique_id(unique_id)?;
        Ok(Self {
            source_column: source_column.into(),
            unique_id,
            target_table: target_table.into(),
            nullable,
            binding: ForeignKeyBinding::Unbound,
        })
    }

    pub fn name(&self) -> &str {
        &self.source_column
    }

    pub fn unique_id(&self) -> i64 {
        self.unique_id
    }

    pub fn target_table(&self) -> &str {
        &self.target_table
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn binding(&self) -> ForeignKeyBinding {
        self.binding
    }

    /// Unique id of the referenced primary key, -1 when unbound
    pub fn unique_id_of_primary_key(&self) -> i64 {
        match self.binding {
            ForeignKeyBinding::Unbound => -1,
            ForeignKeyBinding::Bound(id) => id,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self.binding, ForeignKeyBinding::Bound(_))
    }

    pub fn set_binding(&mut self, binding: ForeignKeyBinding) {
        self.binding = binding;
    }

    /// Ids of the target table's primary keys preceding this gene, in order
    pub fn candidate_primary_keys(&self, all_genes: &[Gene]) -> Vec<i64> {
        let mut candidates = Vec::new();
        let preceding = all_genes
            .iter()
            .flat_map(|g| g.flat_view())
            .take_while(|g| !matches!(g, Gene::SqlForeignKey(fk) if fk.unique_id == self.unique_id));

        for gene in preceding {
            if let Gene::SqlPrimaryKey(pk) = gene {
                if pk.table_name() == self.target_table && !candidates.contains(&pk.unique_id()) {
                    candidates.push(pk.unique_id());
                }
            }
        }
        candidates
    }

    pub fn randomize_in_context(
        &mut self,
        randomness: &mut Randomness,
        force_new_value: bool,
        all_genes: &[Gene],
    ) -> Result<()> {
        let candidates = self.candidate_primary_keys(all_genes);

        if candidates.is_empty() {
            if !self.nullable {
                return Err(GeneError::UnsatisfiableConstraint {
                    column: self.source_column.clone(),
                    table: self.target_table.clone(),
                });
            }
            self.binding = ForeignKeyBinding::Unbound;
            return Ok(());
        }

        self.binding = match self.binding {
            ForeignKeyBinding::Bound(_) if self.nullable && randomness.next_boolean(NULL_PROBABILITY) => {
                ForeignKeyBinding::Unbound
            }
            ForeignKeyBinding::Unbound if self.nullable => ForeignKeyBinding::Bound(randomness.choose(&candidates)?),
            _ => ForeignKeyBinding::Bound(self.pick(randomness, &candidates, force_new_value)?),
        };

        debug!(
            "foreign key {} ({}) bound to {:?}",
            self.source_column, self.unique_id, self.binding
        );
        Ok(())
    }

    fn pick(&self, randomness: &mut Randomness, candidates: &[i64], force_new_value: bool) -> Result<i64> {
        if candidates.len() == 1 {
            return Ok(candidates[0]);
        }
        if !force_new_value {
            return randomness.choose(candidates);
        }
        let current = self.unique_id_of_primary_key();
        let others: Vec<i64> = candidates.iter().copied().filter(|&id| id != current).collect();
        randomness.choose(&others)
    }

    fn find_primary_key<'a>(&self, previous_genes: &'a [Gene], id: i64) -> Result<&'a SqlPrimaryKeyGene> {
        previous_genes
            .iter()
            .flat_map(|g| g.flat_view())
            .find_map(|g| match g {
                Gene::SqlPrimaryKey(pk) if pk.unique_id() == id => Some(pk),
                _ => None,
            })
            .ok_or(GeneError::MissingPrimaryKey(id))
    }

    pub fn value_as_printable_string(
        &self,
        previous_genes: &[Gene],
        mode: RenderMode,
        target: Option<OutputFormat>,
    ) -> Result<String> {
        let id = match self.binding {
            ForeignKeyBinding::Unbound if self.nullable => return Ok(NULL_LITERAL.to_string()),
            ForeignKeyBinding::Unbound => {
                return Err(GeneError::UnboundForeignKey {
                    column: self.source_column.clone(),
                    table: self.target_table.clone(),
                })
            }
            ForeignKeyBinding::Bound(id) => id,
        };

        let pk = self.find_primary_key(previous_genes, id)?;
        if !pk.is_printable() {
            return Err(GeneError::NonPrintablePrimaryKey(id));
        }
        pk.value_as_printable_string(previous_genes, mode, target)
    }

    /// Whether the referenced primary key is only known after insertion
    pub fn is_reference_to_non_printable(&self, previous_genes: &[Gene]) -> Result<bool> {
        match self.binding {
            ForeignKeyBinding::Unbound => Ok(false),
            ForeignKeyBinding::Bound(id) => Ok(!self.find_primary_key(previous_genes, id)?.is_printable()),
        }
    }

    pub fn value_as_raw_string(&self) -> Result<String> {
        match self.binding {
            ForeignKeyBinding::Unbound if self.nullable => Ok(NULL_LITERAL.to_string()),
            _ => Err(GeneError::ContextRequired {
                gene: self.source_column.clone(),
            }),
        }
    }

    pub fn copy_value_from(&mut self, other: &SqlForeignKeyGene) {
        self.binding = other.binding;
    }
}
