use anyhow::Context;
use evogene::config::ConfigManager;
use evogene::engines::genes::{Gene, Individual, IntegerGene, SqlForeignKeyGene, SqlPrimaryKeyGene, StringGene};
use evogene::engines::search::SearchServices;
use evogene::types::{OutputFormat, RenderMode};

const MUTATION_STEPS: usize = 50;

/// Two `author` rows, a `book` row referencing one of them, and a title
fn sample_individual() -> anyhow::Result<Individual> {
    let author_1 = SqlPrimaryKeyGene::new("id", "author", 1, Gene::Integer(IntegerGene::new("id", 1).with_bounds(1, 1000)))?;
    let author_2 = SqlPrimaryKeyGene::autogenerated("id", "author", 2)?;
    let book = SqlPrimaryKeyGene::new("id", "book", 3, Gene::Integer(IntegerGene::new("id", 1).with_bounds(1, 1000)))?;
    let author_ref = SqlForeignKeyGene::new("author_id", 0, "author", true)?;
    let title = StringGene::new("title", "foo").with_bounds(1, 20).with_invalid_chars(['"', '\\']);

    Ok(Individual::new(vec![
        Gene::SqlPrimaryKey(author_1),
        Gene::SqlPrimaryKey(author_2),
        Gene::SqlPrimaryKey(book),
        Gene::SqlForeignKey(author_ref),
        Gene::String(title),
    ]))
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let manager = ConfigManager::new();
    if let Some(path) = std::env::args().nth(1) {
        manager
            .load_from_file(&path)
            .with_context(|| format!("loading {}", path))?;
    }
    let config = manager.get()?;

    let mut services = SearchServices::from_config(&config);
    let mut individual = sample_individual()?;
    individual.randomize(&mut services.randomness)?;

    for step in 0..MUTATION_STEPS {
        services
            .apc
            .set_consumed_budget(step as f64 / MUTATION_STEPS as f64);
        let index = services.randomness.next_int(individual.len())?;
        individual.standard_mutation(index, &mut services)?;
    }

    for (i, gene) in individual.genes().iter().enumerate() {
        let previous = &individual.genes()[..i];
        let rendered = match gene {
            Gene::SqlForeignKey(fk) if fk.is_reference_to_non_printable(previous)? => {
                format!("<generated key {}>", fk.unique_id_of_primary_key())
            }
            _ if !gene.is_printable() => "<generated>".to_string(),
            _ => gene.value_as_printable_string(previous, RenderMode::Raw, Some(OutputFormat::KotlinJunit5))?,
        };
        println!("{:<20} {}", format!("{}:{}", gene.kind(), gene.name()), rendered);
    }

    Ok(())
}
