use evogene::config::AppConfig;
use evogene::engines::genes::{Gene, Individual, StringGene};
use evogene::engines::search::{is_taint_input, SearchServices};
use evogene::types::{OutputFormat, RenderMode, StringSpecialization, StringSpecializationInfo};

/// Services with a fixed seed and taint seeding switched off
fn create_test_services(seed: u64) -> SearchServices {
    let mut config = AppConfig::default();
    config.search.seed = Some(seed);
    let mut services = SearchServices::from_config(&config);
    services.apc.set_consumed_budget(1.0);
    services
}

fn string_of(gene: &Gene) -> &StringGene {
    match gene {
        Gene::String(s) => s,
        other => panic!("expected a string gene, got {}", other.kind()),
    }
}

#[test]
fn test_length_invariant_holds_under_mutation() {
    for seed in 0..5 {
        let mut services = create_test_services(seed);
        let mut gene = Gene::String(StringGene::new("s", "ab").with_bounds(2, 6));
        let context = vec![
            Gene::String(StringGene::new("other", "hello")),
            Gene::String(StringGene::new("long", "much too long for s")),
        ];

        for _ in 0..1000 {
            gene.standard_mutation(&mut services, &context).unwrap();
            let len = string_of(&gene).value().chars().count();
            assert!((2..=6).contains(&len), "seed {}: length {}", seed, len);
        }
    }
}

#[test]
fn test_invalid_chars_never_survive_mutation() {
    let mut services = create_test_services(3);
    let invalid = ['a', 'b', '/', '_'];
    let mut gene = Gene::String(StringGene::new("path", "cc").with_bounds(0, 8).with_invalid_chars(invalid));

    for _ in 0..1000 {
        gene.standard_mutation(&mut services, &[]).unwrap();
        let value = string_of(&gene).value();
        assert!(!value.chars().any(|c| invalid.contains(&c)), "invalid char in {:?}", value);
    }
}

#[test]
fn test_taint_marker_seeding() {
    let mut config = AppConfig::default();
    config.search.seed = Some(1);
    config.mutation.taint_probability_start = 1.0;
    let mut services = SearchServices::from_config(&config);

    let mut gene = Gene::String(StringGene::new("s", "foo"));
    gene.standard_mutation(&mut services, &[]).unwrap();
    let first = string_of(&gene).value().to_string();
    assert!(is_taint_input(&first));

    // Already a marker, so the next step edits it instead of minting a new one
    gene.standard_mutation(&mut services, &[]).unwrap();
    let mut other = Gene::String(StringGene::new("t", "bar"));
    other.standard_mutation(&mut services, &[]).unwrap();
    let second = string_of(&other).value().to_string();
    assert!(is_taint_input(&second));
    assert_ne!(first, second);
}

#[test]
fn test_taint_marker_skipped_when_too_long() {
    let mut config = AppConfig::default();
    config.search.seed = Some(1);
    config.mutation.taint_probability_start = 1.0;
    let mut services = SearchServices::from_config(&config);

    let mut gene = Gene::String(StringGene::new("s", "ab").with_bounds(0, 4));
    for _ in 0..100 {
        gene.standard_mutation(&mut services, &[]).unwrap();
        assert!(!is_taint_input(string_of(&gene).value()));
    }
}

#[test]
fn test_specialization_takes_over_rendering() {
    let mut services = create_test_services(7);
    let specializations = vec![
        StringSpecializationInfo::new(StringSpecialization::Constant, "OK"),
        StringSpecializationInfo::new(StringSpecialization::Constant, "KO"),
    ];
    let mut gene = Gene::String(StringGene::new("status", "foo").with_specializations(specializations));

    for _ in 0..10 {
        gene.standard_mutation(&mut services, &[]).unwrap();
        let s = string_of(&gene);
        assert_eq!(s.value(), "foo");
        let printed = gene.value_as_printable_string(&[], RenderMode::Raw, None).unwrap();
        assert!(printed == "\"OK\"" || printed == "\"KO\"", "got {}", printed);
    }
}

#[test]
fn test_integer_specialization_renders_quoted_number() {
    let mut services = create_test_services(2);
    let specializations = vec![StringSpecializationInfo::new(StringSpecialization::Integer, "")];
    let mut gene = Gene::String(StringGene::new("n", "x").with_specializations(specializations));
    gene.standard_mutation(&mut services, &[]).unwrap();

    let printed = gene.value_as_printable_string(&[], RenderMode::Raw, None).unwrap();
    let inner = printed.trim_matches('"');
    assert!(inner.parse::<i32>().is_ok(), "got {}", printed);
}

#[test]
fn test_copy_and_copy_value_from() {
    let mut services = create_test_services(4);
    let mut gene = Gene::String(StringGene::new("s", "hello"));
    for _ in 0..20 {
        gene.standard_mutation(&mut services, &[]).unwrap();
    }

    let copy = gene.copy();
    assert!(gene.contains_same_value_as(&copy).unwrap());

    let mut target = Gene::String(StringGene::new("s", "zzz"));
    target.copy_value_from(&gene).unwrap();
    assert!(target.contains_same_value_as(&gene).unwrap());

    // The copy is independent
    gene.standard_mutation(&mut services, &[]).unwrap();
    assert_eq!(string_of(&copy).value(), string_of(&target).value());
}

#[test]
fn test_copy_value_from_specialized() {
    let mut services = create_test_services(6);
    let specializations = vec![StringSpecializationInfo::new(StringSpecialization::DateYyyyMmDd, "")];
    let mut specialized = Gene::String(StringGene::new("d", "foo").with_specializations(specializations));
    specialized.standard_mutation(&mut services, &[]).unwrap();

    let mut plain = Gene::String(StringGene::new("d", "foo"));
    assert!(!plain.contains_same_value_as(&specialized).unwrap());
    plain.copy_value_from(&specialized).unwrap();
    assert!(plain.contains_same_value_as(&specialized).unwrap());
}

#[test]
fn test_kotlin_rendering_escapes_template_marker() {
    let gene = Gene::String(StringGene::new("s", "a$b"));
    let printed = gene
        .value_as_printable_string(&[], RenderMode::Raw, Some(OutputFormat::KotlinJunit4))
        .unwrap();
    assert_eq!(printed, "\"a\\$b\"");

    let java = gene
        .value_as_printable_string(&[], RenderMode::Raw, Some(OutputFormat::JavaJunit4))
        .unwrap();
    assert_eq!(java, "\"a$b\"");
}

#[test]
fn test_individual_standard_mutation_uses_siblings() {
    let mut services = create_test_services(10);
    let mut individual = Individual::new(vec![
        Gene::String(StringGene::new("a", "seed-value")),
        Gene::String(StringGene::new("b", "x").with_bounds(0, 16)),
    ]);

    let mut seeded = false;
    for _ in 0..2000 {
        individual.standard_mutation(1, &mut services).unwrap();
        if string_of(individual.gene(1).unwrap()).value() == "seed-value" {
            seeded = true;
            break;
        }
    }
    assert!(seeded, "cross-gene seeding never happened");
    assert_eq!(string_of(individual.gene(0).unwrap()).value(), "seed-value");
}

#[test]
fn test_out_of_range_index() {
    let mut services = create_test_services(1);
    let mut individual = Individual::new(vec![]);
    assert!(individual.standard_mutation(0, &mut services).is_err());
}
