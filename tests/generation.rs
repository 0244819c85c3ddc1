// tests/generation.rs
use rand::SeedableRng;
use rand_pcg::Pcg32;
use symbios_blossom::{Error, GrammarError, JitterTable, PlacementKind, TreeConfig, TreeGenerator};

fn reference() -> TreeConfig {
    TreeConfig::from_toml_str(include_str!("../config/reference.toml")).unwrap()
}

#[test]
fn test_reference_tree() {
    let generator = TreeGenerator::new(reference()).unwrap();
    assert_eq!(generator.seed(), 42);
    assert_eq!(generator.jitter().len(), 100);

    let generation = generator.generate_seeded().unwrap();

    let segments = generation.symbols.chars().filter(|&c| c == 'F').count();
    assert_eq!(generation.blueprint.len(), segments);
    assert_eq!(generation.max_depth, 4);
    assert!(generation.unrecognized.is_empty());

    let (min, max) = generation.blueprint.bounds().unwrap();
    assert!(max.y > min.y, "tree should grow upwards");

    let trunk = &generation.blueprint.commands[0];
    assert_eq!(trunk.kind, PlacementKind::Branch);
}

#[test]
fn test_seeded_generation_is_reproducible() {
    let a = TreeGenerator::new(reference())
        .unwrap()
        .generate_seeded()
        .unwrap();
    let b = TreeGenerator::new(reference())
        .unwrap()
        .generate_seeded()
        .unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_sizing_rng_changes_lengths_only() {
    let generator = TreeGenerator::new(reference()).unwrap();

    let a = generator.generate(&mut Pcg32::seed_from_u64(1)).unwrap();
    let b = generator.generate(&mut Pcg32::seed_from_u64(2)).unwrap();

    assert_eq!(a.symbols, b.symbols);
    assert_eq!(a.blueprint.len(), b.blueprint.len());
    let kinds = |g: &symbios_blossom::Generation| -> Vec<PlacementKind> {
        g.blueprint.iter().map(|c| c.kind).collect()
    };
    assert_eq!(kinds(&a), kinds(&b));
    assert_ne!(a.blueprint, b.blueprint);
}

#[test]
fn test_unseeded_generator_draws_a_seed() {
    let mut config = reference();
    config.jitter.seed = None;
    let generator = TreeGenerator::new(config).unwrap();
    assert_eq!(
        generator.jitter(),
        &JitterTable::from_seed(generator.seed(), 100)
    );
}

#[test]
fn test_expansion_limit_surfaces_as_error() {
    let mut config = reference();
    config.grammar.max_symbols = 10;
    let generator = TreeGenerator::new(config).unwrap();

    let err = generator.generate_seeded().unwrap_err();
    assert!(matches!(
        err,
        Error::Grammar(GrammarError::ExpansionLimit { iteration: 1, .. })
    ));
}

#[test]
fn test_invalid_config_is_rejected_by_generator() {
    let mut config = reference();
    config.turtle.shrink.length_scale = 0.0;
    assert!(matches!(TreeGenerator::new(config), Err(Error::Config(_))));
}

#[test]
fn test_jitter_table_values() {
    let table = JitterTable::from_seed(5, 64);
    assert_eq!(table.len(), 64);
    assert!(table.values().iter().all(|v| (-1.0..=1.0).contains(v)));
    assert_eq!(table, JitterTable::from_seed(5, 64));
    assert_ne!(table, JitterTable::from_seed(6, 64));
    assert_eq!(table.get(3), table.get(67));
    assert_eq!(JitterTable::zero().get(12), 0.0);
}

#[test]
fn test_validated_extreme_config_generates() {
    let toml = include_str!("../config/reference.toml")
        .replace("min_branch_length = 0.2", "min_branch_length = -3.0e38")
        .replace("max_branch_length = 0.4", "max_branch_length = 3.0e38")
        .replace("length_scale = 0.8", "length_scale = 2.0");
    let config = TreeConfig::from_toml_str(&toml).unwrap();

    let generation = TreeGenerator::new(config)
        .unwrap()
        .generate_seeded()
        .unwrap();

    assert!(!generation.blueprint.is_empty());
    assert!(generation.blueprint.iter().all(|c| c.scale.is_finite()));
}
