use evogene::config::AppConfig;
use evogene::engines::genes::{Gene, Individual, IntegerGene, StringGene};
use evogene::engines::search::{ImpactArchive, SearchServices};

fn create_test_services(seed: u64, relaxed: bool) -> SearchServices {
    let mut config = AppConfig::default();
    config.search.seed = Some(seed);
    config.archive.relax_index_string_mutation = relaxed;
    let mut services = SearchServices::from_config(&config);
    services.apc.set_consumed_budget(1.0);
    services
}

fn distance(gene: &Gene, target: i32) -> i32 {
    match gene {
        Gene::Integer(g) => (g.value() - target).abs(),
        other => panic!("expected an integer gene, got {}", other.kind()),
    }
}

/// Archive step followed by feedback, keeping the value only when it improved
fn archive_step<F>(gene: &mut Gene, services: &mut SearchServices, impacts: &ImpactArchive, fitness: F) -> bool
where
    F: Fn(&Gene) -> i32,
{
    let original = gene.copy();
    gene.archive_mutation(services, &[], None, impacts).unwrap();
    let better = fitness(gene) < fitness(&original);
    let mutated = gene.copy();
    gene.archive_mutation_update(&original, &mutated, better, &services.archive)
        .unwrap();
    if !better {
        gene.copy_value_from(&original).unwrap();
    }
    better
}

#[test]
fn test_integer_search_converges_on_target() {
    let mut services = create_test_services(21, false);
    let impacts = ImpactArchive::new();
    let mut gene = Gene::Integer(IntegerGene::new("n", 0).with_bounds(0, 100));

    for _ in 0..1000 {
        if gene.reach_optimal() {
            break;
        }
        archive_step(&mut gene, &mut services, &impacts, |g| distance(g, 42));
        if let Gene::Integer(g) = &gene {
            assert!(g.value_mutation().contains(42), "target left the preferred interval");
        }
    }

    assert!(gene.reach_optimal());
    assert_eq!(distance(&gene, 42), 0);
}

#[test]
fn test_fixed_length_string_converges() {
    let mut services = create_test_services(13, false);
    let impacts = ImpactArchive::new();
    let mut gene = Gene::String(StringGene::new("s", "ab").with_bounds(2, 2));

    // Distance of every char to 'a'
    let fitness = |g: &Gene| match g {
        Gene::String(s) => s.value().chars().map(|c| (c as i32 - 'a' as i32).abs()).sum::<i32>(),
        _ => i32::MAX,
    };

    for _ in 0..5000 {
        if gene.reach_optimal() {
            break;
        }
        archive_step(&mut gene, &mut services, &impacts, fitness);
    }

    let Gene::String(s) = &gene else {
        panic!("variant changed");
    };
    assert!(s.length_mutation().reached);
    assert!(gene.reach_optimal());
    assert_eq!(s.value().chars().count(), 2);
}

#[test]
fn test_emptied_string_closes_char_dimension() {
    let services = create_test_services(1, false);
    let original = Gene::String(StringGene::new("s", "a").with_bounds(0, 1));
    let mutated = Gene::String(StringGene::new("s", "").with_bounds(0, 1));
    let mut gene = mutated.clone();

    gene.archive_mutation_update(&original, &mutated, true, &services.archive)
        .unwrap();

    let Gene::String(s) = &gene else {
        panic!("variant changed");
    };
    assert!(s.length_mutation().reached);
    assert_eq!(s.mutated_index(), Some(0));
    assert!(s.chars_mutation()[0].reached);
    assert!(gene.reach_optimal());
}

#[test]
fn test_string_archive_mutation_respects_constraints() {
    for relaxed in [false, true] {
        let mut services = create_test_services(9, relaxed);
        let impacts = ImpactArchive::new();
        let mut gene = Gene::String(StringGene::new("s", "hello").with_bounds(1, 8).with_invalid_chars(['x']));

        // Lower code points are better
        let fitness = |g: &Gene| match g {
            Gene::String(s) => s.value().chars().map(|c| c as i32).sum::<i32>(),
            _ => i32::MAX,
        };

        for _ in 0..300 {
            if gene.reach_optimal() {
                break;
            }
            archive_step(&mut gene, &mut services, &impacts, fitness);
            let Gene::String(s) = &gene else {
                panic!("variant changed");
            };
            let len = s.value().chars().count();
            assert!((1..=8).contains(&len));
            assert!(!s.value().contains('x'));
            for tracker in s.chars_mutation() {
                assert!(tracker.prefer_min <= tracker.prefer_max);
            }
        }
    }
}

#[test]
fn test_individual_archive_round() {
    let mut services = create_test_services(4, false);
    let mut impacts = ImpactArchive::new();
    let mut individual = Individual::new(vec![
        Gene::String(StringGene::new("name", "abc")),
        Gene::Integer(IntegerGene::new("age", 30).with_bounds(0, 120)),
    ]);

    for index in [0, 1, 0, 1] {
        let original = individual.archive_mutation(index, &mut services, &impacts).unwrap();
        let changed = !individual.gene(index).unwrap().contains_same_value_as(&original).unwrap();
        impacts.record(&original, changed);
        individual.archive_feedback(index, &original, changed, &services).unwrap();
    }

    assert_eq!(impacts.len(), 2);
    let first = individual.genes()[0].clone();
    assert!(individual.archive_feedback(5, &first, true, &services).is_err());
}

#[test]
fn test_specialized_string_needs_impact() {
    use evogene::types::{StringSpecialization, StringSpecializationInfo};

    let mut services = create_test_services(2, false);
    let specializations = vec![StringSpecializationInfo::new(StringSpecialization::Integer, "")];
    let mut gene = Gene::String(StringGene::new("code", "x").with_specializations(specializations));

    let empty = ImpactArchive::new();
    assert!(gene.archive_mutation(&mut services, &[], None, &empty).is_err());

    let mut impacts = ImpactArchive::new();
    impacts.record(&gene, true);
    gene.archive_mutation(&mut services, &[], None, &impacts).unwrap();
}
