use evogene::engines::genes::{
    DateGene, EnumGene, ForeignKeyBinding, Gene, IntegerGene, SqlForeignKeyGene, SqlPrimaryKeyGene,
};
use evogene::engines::search::Randomness;

fn sample_genes() -> Vec<Gene> {
    let assigned = SqlPrimaryKeyGene::new("id", "T", 1, Gene::Integer(IntegerGene::new("id", 7))).unwrap();
    let autogenerated = SqlPrimaryKeyGene::autogenerated("id", "T", 2).unwrap();
    let mut fk = SqlForeignKeyGene::new("ref_id", 3, "T", true).unwrap();
    fk.set_binding(ForeignKeyBinding::Bound(1));

    vec![
        Gene::Integer(IntegerGene::new("n", 5).with_bounds(0, 100)),
        Gene::Date(DateGene::new("d")),
        Gene::Enum(EnumGene::new("e", vec!["a".into(), "b".into(), "c".into()]).unwrap()),
        Gene::SqlPrimaryKey(assigned),
        Gene::SqlPrimaryKey(autogenerated),
        Gene::SqlForeignKey(fk),
    ]
}

/// Move `gene` to another value of the same variant
fn diverge(gene: &mut Gene, randomness: &mut Randomness) {
    match gene {
        Gene::SqlForeignKey(fk) => fk.set_binding(ForeignKeyBinding::Unbound),
        other => other.randomize(randomness, true).unwrap(),
    }
}

#[test]
fn test_copy_has_same_value() {
    for gene in sample_genes() {
        let copy = gene.copy();
        assert!(gene.contains_same_value_as(&copy).unwrap(), "{}", gene.kind());
        assert!(copy.contains_same_value_as(&gene).unwrap(), "{}", gene.kind());
    }
}

#[test]
fn test_copy_value_from_makes_values_equal() {
    let mut randomness = Randomness::seeded(17);
    for gene in sample_genes() {
        let mut target = gene.copy();
        diverge(&mut target, &mut randomness);

        target.copy_value_from(&gene).unwrap();
        assert!(target.contains_same_value_as(&gene).unwrap(), "{}", gene.kind());
        assert_eq!(target.name(), gene.name());
    }
}

#[test]
fn test_changing_copy_leaves_original() {
    let mut randomness = Randomness::seeded(18);
    for gene in sample_genes() {
        let snapshot = gene.copy();
        let mut copy = gene.copy();
        diverge(&mut copy, &mut randomness);
        assert!(gene.contains_same_value_as(&snapshot).unwrap(), "{}", gene.kind());
    }
}

#[test]
fn test_primary_key_states_do_not_mix() {
    let genes = sample_genes();
    let mut assigned = genes[3].copy();
    let autogenerated = &genes[4];

    assert!(!assigned.contains_same_value_as(autogenerated).unwrap());
    assert!(assigned.copy_value_from(autogenerated).is_err());
}
