use super::date::DateGene;
use super::enumeration::EnumGene;
use super::number::IntegerGene;
use super::sql::{SqlForeignKeyGene, SqlPrimaryKeyGene};
use super::string::StringGene;
use crate::engines::search::adaptive::AdaptiveParameterControl;
use crate::engines::search::archive::ArchiveMutator;
use crate::engines::search::impact::{GeneImpact, ImpactLookup};
use crate::engines::search::randomness::Randomness;
use crate::engines::search::SearchServices;
use crate::error::{GeneError, Result};
use crate::types::{OutputFormat, RenderMode};

/// One mutable unit of a test case's input.
///
/// The variant set is closed: every operation dispatches with an exhaustive
/// match, and operations pairing two genes reject mismatched variants with
/// [`GeneError::VariantMismatch`]. `clone()` is the deep copy; foreign keys
/// keep their identity fields verbatim.
#[derive(Debug, Clone)]
pub enum Gene {
    String(StringGene),
    Integer(IntegerGene),
    Date(DateGene),
    Enum(EnumGene),
    SqlPrimaryKey(SqlPrimaryKeyGene),
    SqlForeignKey(SqlForeignKeyGene),
}

impl Gene {
    pub fn name(&self) -> &str {
        match self {
            Gene::String(g) => g.name(),
            Gene::Integer(g) => g.name(),
            Gene::Date(g) => g.name(),
            Gene::Enum(g) => g.name(),
            Gene::SqlPrimaryKey(g) => g.name(),
            Gene::SqlForeignKey(g) => g.name(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Gene::String(_) => "StringGene",
            Gene::Integer(_) => "IntegerGene",
            Gene::Date(_) => "DateGene",
            Gene::Enum(_) => "EnumGene",
            Gene::SqlPrimaryKey(_) => "SqlPrimaryKeyGene",
            Gene::SqlForeignKey(_) => "SqlForeignKeyGene",
        }
    }

    pub fn copy(&self) -> Gene {
        self.clone()
    }

    /// Context-free randomization. Fails for genes whose value depends on
    /// the rest of the individual.
    pub fn randomize(&mut self, randomness: &mut Randomness, force_new_value: bool) -> Result<()> {
        match self {
            Gene::String(g) => {
                g.randomize(randomness);
                Ok(())
            }
            Gene::Integer(g) => {
                g.randomize(randomness, force_new_value);
                Ok(())
            }
            Gene::Date(g) => {
                g.randomize(randomness, force_new_value);
                Ok(())
            }
            Gene::Enum(g) => g.randomize(randomness, force_new_value),
            Gene::SqlPrimaryKey(g) => g.randomize(randomness, force_new_value),
            Gene::SqlForeignKey(g) => Err(GeneError::ContextRequired {
                gene: g.name().to_string(),
            }),
        }
    }

    /// Randomization with `all_genes`, the ordered genes of the owning individual
    pub fn randomize_in_context(
        &mut self,
        randomness: &mut Randomness,
        force_new_value: bool,
        all_genes: &[Gene],
    ) -> Result<()> {
        match self {
            Gene::SqlForeignKey(g) => g.randomize_in_context(randomness, force_new_value, all_genes),
            Gene::SqlPrimaryKey(g) => g.randomize_in_context(randomness, force_new_value, all_genes),
            _ => self.randomize(randomness, force_new_value),
        }
    }

    /// Blind mutation of this gene in place
    pub fn standard_mutation(&mut self, services: &mut SearchServices, all_genes: &[Gene]) -> Result<()> {
        match self {
            Gene::String(g) => g.standard_mutation(services, all_genes),
            Gene::Integer(g) => {
                g.standard_mutation(&mut services.randomness, &services.apc);
                Ok(())
            }
            Gene::Date(g) => {
                g.standard_mutation(&mut services.randomness, &services.apc);
                Ok(())
            }
            Gene::Enum(g) => g.randomize(&mut services.randomness, true),
            Gene::SqlPrimaryKey(g) => g.standard_mutation(services, all_genes),
            Gene::SqlForeignKey(g) => g.randomize_in_context(&mut services.randomness, true, all_genes),
        }
    }

    /// Mutation guided by the convergence state the gene carries.
    ///
    /// `impact` is the impact record of this gene if the caller already has
    /// it, otherwise genes that delegate look it up in `impacts`.
    pub fn archive_mutation(
        &mut self,
        services: &mut SearchServices,
        all_genes: &[Gene],
        impact: Option<&GeneImpact>,
        impacts: &dyn ImpactLookup,
    ) -> Result<()> {
        match self {
            Gene::String(g) => g.archive_mutation(services, all_genes, impact, impacts),
            Gene::Integer(g) => {
                g.archive_mutation(&services.archive, &mut services.randomness, &services.apc);
                Ok(())
            }
            Gene::SqlPrimaryKey(g) => g.archive_mutation(services, all_genes, impact, impacts),
            _ => self.standard_mutation(services, all_genes),
        }
    }

    /// Feed back whether `mutated` did better than `original` into the
    /// trackers of this gene
    pub fn archive_mutation_update(
        &mut self,
        original: &Gene,
        mutated: &Gene,
        does_current_better: bool,
        archive: &ArchiveMutator,
    ) -> Result<()> {
        match (self, original, mutated) {
            (Gene::String(g), Gene::String(o), Gene::String(m)) => {
                g.archive_mutation_update(o, m, does_current_better, archive)
            }
            (Gene::Integer(g), Gene::Integer(o), Gene::Integer(m)) => {
                g.archive_mutation_update(o, m, does_current_better);
                Ok(())
            }
            (Gene::SqlPrimaryKey(g), Gene::SqlPrimaryKey(o), Gene::SqlPrimaryKey(m)) => {
                g.archive_mutation_update(o, m, does_current_better, archive)
            }
            (Gene::Date(_), Gene::Date(_), Gene::Date(_))
            | (Gene::Enum(_), Gene::Enum(_), Gene::Enum(_))
            | (Gene::SqlForeignKey(_), Gene::SqlForeignKey(_), Gene::SqlForeignKey(_)) => Ok(()),
            (this, original, mutated) => {
                let actual = if original.kind() != this.kind() {
                    original.kind()
                } else {
                    mutated.kind()
                };
                Err(GeneError::mismatch(this.kind(), actual))
            }
        }
    }

    /// Whether every tracked dimension of this gene has converged
    pub fn reach_optimal(&self) -> bool {
        match self {
            Gene::String(g) => g.reach_optimal(),
            Gene::Integer(g) => g.reach_optimal(),
            Gene::Enum(g) => g.values().len() <= 1,
            Gene::SqlPrimaryKey(g) => g.reach_optimal(),
            Gene::Date(_) | Gene::SqlForeignKey(_) => false,
        }
    }

    pub fn is_printable(&self) -> bool {
        match self {
            Gene::SqlPrimaryKey(g) => g.is_printable(),
            _ => true,
        }
    }

    /// Value as it must appear in generated test code. `previous_genes` are
    /// the genes preceding this one in its individual.
    pub fn value_as_printable_string(
        &self,
        previous_genes: &[Gene],
        mode: RenderMode,
        target: Option<OutputFormat>,
    ) -> Result<String> {
        match self {
            Gene::String(g) => g.value_as_printable_string(mode, target),
            Gene::Integer(g) => Ok(g.value_as_raw_string()),
            Gene::Date(g) => Ok(g.value_as_printable_string()),
            Gene::Enum(g) => Ok(g.value_as_printable_string(mode, target)),
            Gene::SqlPrimaryKey(g) => g.value_as_printable_string(previous_genes, mode, target),
            Gene::SqlForeignKey(g) => g.value_as_printable_string(previous_genes, mode, target),
        }
    }

    pub fn value_as_raw_string(&self) -> Result<String> {
        match self {
            Gene::String(g) => g.value_as_raw_string(),
            Gene::Integer(g) => Ok(g.value_as_raw_string()),
            Gene::Date(g) => Ok(g.value_as_raw_string()),
            Gene::Enum(g) => Ok(g.value_as_raw_string().to_string()),
            Gene::SqlPrimaryKey(g) => g.value_as_raw_string(),
            Gene::SqlForeignKey(g) => g.value_as_raw_string(),
        }
    }

    pub fn copy_value_from(&mut self, other: &Gene) -> Result<()> {
        match (self, other) {
            (Gene::String(g), Gene::String(o)) => g.copy_value_from(o),
            (Gene::Integer(g), Gene::Integer(o)) => {
                g.copy_value_from(o);
                Ok(())
            }
            (Gene::Date(g), Gene::Date(o)) => {
                g.copy_value_from(o);
                Ok(())
            }
            (Gene::Enum(g), Gene::Enum(o)) => g.copy_value_from(o),
            (Gene::SqlPrimaryKey(g), Gene::SqlPrimaryKey(o)) => g.copy_value_from(o),
            (Gene::SqlForeignKey(g), Gene::SqlForeignKey(o)) => {
                g.copy_value_from(o);
                Ok(())
            }
            (this, other) => Err(GeneError::mismatch(this.kind(), other.kind())),
        }
    }

    pub fn contains_same_value_as(&self, other: &Gene) -> Result<bool> {
        match (self, other) {
            (Gene::String(g), Gene::String(o)) => g.contains_same_value_as(o),
            (Gene::Integer(g), Gene::Integer(o)) => Ok(g.value() == o.value()),
            (Gene::Date(g), Gene::Date(o)) => Ok(g.contains_same_value_as(o)),
            (Gene::Enum(g), Gene::Enum(o)) => Ok(g.value_as_raw_string() == o.value_as_raw_string()),
            (Gene::SqlPrimaryKey(g), Gene::SqlPrimaryKey(o)) => g.contains_same_value_as(o),
            (Gene::SqlForeignKey(g), Gene::SqlForeignKey(o)) => Ok(g.binding() == o.binding()),
            (this, other) => Err(GeneError::mismatch(this.kind(), other.kind())),
        }
    }

    /// This gene followed by every gene nested in it
    pub fn flat_view(&self) -> Vec<&Gene> {
        let mut view = vec![self];
        match self {
            Gene::String(g) => {
                if let Some(inner) = g.specialization_gene() {
                    view.extend(inner.flat_view());
                }
            }
            Gene::SqlPrimaryKey(g) => {
                if let Some(inner) = g.assigned_gene() {
                    view.extend(inner.flat_view());
                }
            }
            _ => {}
        }
        view
    }
}

/// Magnitude of a numeric delta: a power of two whose exponent is geometric,
/// capped by the adaptive delta weights, so small steps dominate.
pub(crate) fn get_delta(randomness: &mut Randomness, apc: &AdaptiveParameterControl, range: i64) -> i64 {
    let (start, end) = apc.delta_weights();
    let max_index = apc.exploratory_value(start, end).max(1);

    let mut n = 0;
    for i in 0..max_index {
        n = i + 1;
        if randomness.coin() {
            break;
        }
    }

    (1i64 << (n - 1)).min(range.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MutationConfig;

    #[test]
    fn test_delta_bounded_by_weights() {
        let apc = AdaptiveParameterControl::new(MutationConfig::default());
        let mut randomness = Randomness::seeded(11);
        for _ in 0..200 {
            let delta = get_delta(&mut randomness, &apc, i64::MAX);
            assert!((1..=32).contains(&delta));
        }
        assert_eq!(get_delta(&mut randomness, &apc, 1), 1);
    }

    #[test]
    fn test_mismatched_variants_rejected() {
        let mut a = Gene::Integer(IntegerGene::new("a", 1));
        let b = Gene::String(StringGene::new("b", "x"));
        assert!(matches!(
            a.copy_value_from(&b),
            Err(GeneError::VariantMismatch { .. })
        ));
        assert!(a.contains_same_value_as(&b).is_err());
    }
}
