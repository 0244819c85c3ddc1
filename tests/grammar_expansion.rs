// tests/grammar_expansion.rs
use std::collections::BTreeMap;
use symbios_blossom::{Grammar, GrammarError, RuleSet, Symbol, expand};

const ONE_STEP: &str = "F[-FX][/FX][+FX][*FX]";

#[test]
fn test_reference_first_iteration() {
    let rules = RuleSet::reference();
    assert_eq!(expand("X", &rules, 1), ONE_STEP);
}

#[test]
fn test_reference_second_iteration() {
    // Every F doubles, every X re-expands.
    let rules = RuleSet::reference();
    let expected = format!("FF[-FF{ONE_STEP}][/FF{ONE_STEP}][+FF{ONE_STEP}][*FF{ONE_STEP}]");
    let result = expand("X", &rules, 2);
    assert_eq!(result, expected);
    assert_eq!(result.len(), 106);
}

#[test]
fn test_expansion_is_deterministic() {
    let grammar = Grammar::new("X", RuleSet::reference());
    assert_eq!(grammar.expand(4), grammar.expand(4));
}

#[test]
fn test_zero_iterations_returns_axiom() {
    let rules = RuleSet::reference();
    assert_eq!(expand("X+F", &rules, 0), "X+F");
    assert_eq!(expand("", &rules, 5), "");
}

#[test]
fn test_symbols_without_rules_pass_through() {
    let rules = RuleSet::new().with_rule(Symbol::Segment, "FF").unwrap();
    // `+`, `[`, `]` have no rule; `?` is not even in the alphabet.
    assert_eq!(expand("[+F?]", &rules, 2), "[+FFFF?]");
}

#[test]
fn test_rule_with_unknown_symbol_is_rejected() {
    let err = RuleSet::new().with_rule(Symbol::Bud, "F[Q]").unwrap_err();
    assert_eq!(
        err,
        GrammarError::UnknownReplacementSymbol {
            key: 'X',
            symbol: 'Q'
        }
    );
}

#[test]
fn test_rules_from_map() {
    let mut map = BTreeMap::new();
    map.insert("X".to_string(), ONE_STEP.to_string());
    map.insert("F".to_string(), "FF".to_string());
    let rules = RuleSet::try_from(map).unwrap();
    assert_eq!(rules, RuleSet::reference());
    assert_eq!(rules.len(), 2);

    let back: BTreeMap<String, String> = rules.into();
    assert_eq!(back.get("F").map(String::as_str), Some("FF"));
}

#[test]
fn test_rule_map_key_errors() {
    let mut long_key = BTreeMap::new();
    long_key.insert("XY".to_string(), "F".to_string());
    assert_eq!(
        RuleSet::try_from(long_key).unwrap_err(),
        GrammarError::InvalidRuleKey("XY".to_string())
    );

    let mut unknown_key = BTreeMap::new();
    unknown_key.insert("A".to_string(), "F".to_string());
    assert_eq!(
        RuleSet::try_from(unknown_key).unwrap_err(),
        GrammarError::UnknownRuleKey('A')
    );
}

#[test]
fn test_bounded_expansion_stops_before_limit() {
    let grammar = Grammar::new("X", RuleSet::reference());

    // Iteration 2 would produce 106 symbols.
    let err = grammar.expand_bounded(3, 100).unwrap_err();
    assert_eq!(
        err,
        GrammarError::ExpansionLimit {
            iteration: 2,
            length: 106,
            limit: 100
        }
    );

    assert_eq!(grammar.expand_bounded(2, 106).unwrap(), grammar.expand(2));
}

#[test]
fn test_symbol_char_mapping() {
    for sym in Symbol::ALL {
        assert_eq!(Symbol::from_char(sym.as_char()), Some(sym));
    }
    assert_eq!(Symbol::from_char('Q'), None);
}

#[test]
fn test_expansion_limit_counts_symbols_not_bytes() {
    // `é` passes through as one symbol but two bytes.
    let grammar = Grammar::new("éX", RuleSet::reference());

    let err = grammar.expand_bounded(1, 21).unwrap_err();
    assert_eq!(
        err,
        GrammarError::ExpansionLimit {
            iteration: 1,
            length: 22,
            limit: 21
        }
    );

    let expanded = grammar.expand_bounded(1, 22).unwrap();
    assert_eq!(expanded.chars().count(), 22);
}
