//! The symbol alphabet and the deterministic rewriting engine.
//!
//! A [`Grammar`] is an axiom plus a [`RuleSet`]. Expansion replaces every symbol that has a
//! rule with its replacement, in parallel, once per iteration. Characters with no rule (or
//! outside the alphabet entirely) pass through unchanged.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, trace};

/// Errors raised while building rules or running a bounded expansion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GrammarError {
    #[error("rule key `{0}` must be exactly one symbol")]
    InvalidRuleKey(String),

    #[error("rule key `{0}` is not a known symbol")]
    UnknownRuleKey(char),

    #[error("rule for `{key}` produces unknown symbol `{symbol}`")]
    UnknownReplacementSymbol { key: char, symbol: char },

    #[error("iteration {iteration} would grow the string to {length} symbols (limit {limit})")]
    ExpansionLimit {
        iteration: u32,
        length: usize,
        limit: usize,
    },
}

/// The fixed alphabet understood by the turtle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Symbol {
    /// `F`: draw a segment (branch or blossom).
    Segment,
    /// `X`: growth placeholder, inert for the turtle.
    Bud,
    /// `-`: rotate about local +Z.
    YawLeft,
    /// `+`: rotate about local -Z.
    YawRight,
    /// `*`: rotate about local +Y.
    RollLeft,
    /// `/`: rotate about local -Y.
    RollRight,
    /// `[`: save the turtle state.
    Push,
    /// `]`: restore the turtle state.
    Pop,
}

impl Symbol {
    pub const COUNT: usize = 8;

    pub const ALL: [Symbol; Self::COUNT] = [
        Symbol::Segment,
        Symbol::Bud,
        Symbol::YawLeft,
        Symbol::YawRight,
        Symbol::RollLeft,
        Symbol::RollRight,
        Symbol::Push,
        Symbol::Pop,
    ];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'F' => Some(Self::Segment),
            'X' => Some(Self::Bud),
            '-' => Some(Self::YawLeft),
            '+' => Some(Self::YawRight),
            '*' => Some(Self::RollLeft),
            '/' => Some(Self::RollRight),
            '[' => Some(Self::Push),
            ']' => Some(Self::Pop),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Self::Segment => 'F',
            Self::Bud => 'X',
            Self::YawLeft => '-',
            Self::YawRight => '+',
            Self::RollLeft => '*',
            Self::RollRight => '/',
            Self::Push => '[',
            Self::Pop => ']',
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Rewrite rules keyed by [`Symbol`].
///
/// Every replacement is checked on insertion: it may only contain symbols from the alphabet,
/// so whatever the expansion produces is something the interpreter understands.
///
/// In configuration files the set is written as a table of one-character keys:
///
/// ```toml
/// [grammar.rules]
/// X = "F[-FX][/FX][+FX][*FX]"
/// F = "FF"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct RuleSet {
    rules: [Option<String>; Symbol::COUNT],
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The branching tree grammar: `X -> F[-FX][/FX][+FX][*FX]`, `F -> FF`.
    pub fn reference() -> Self {
        let mut rules = Self::new();
        rules.rules[Symbol::Bud.index()] = Some("F[-FX][/FX][+FX][*FX]".to_string());
        rules.rules[Symbol::Segment.index()] = Some("FF".to_string());
        rules
    }

    /// Sets the replacement for `symbol`, replacing any previous rule.
    pub fn insert(
        &mut self,
        symbol: Symbol,
        replacement: impl Into<String>,
    ) -> Result<(), GrammarError> {
        let replacement = replacement.into();
        if let Some(bad) = replacement.chars().find(|c| Symbol::from_char(*c).is_none()) {
            return Err(GrammarError::UnknownReplacementSymbol {
                key: symbol.as_char(),
                symbol: bad,
            });
        }
        self.rules[symbol.index()] = Some(replacement);
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with_rule(
        mut self,
        symbol: Symbol,
        replacement: impl Into<String>,
    ) -> Result<Self, GrammarError> {
        self.insert(symbol, replacement)?;
        Ok(self)
    }

    pub fn get(&self, symbol: Symbol) -> Option<&str> {
        self.rules[symbol.index()].as_deref()
    }

    pub fn len(&self) -> usize {
        self.rules.iter().filter(|r| r.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replacement for a raw character, `None` if it passes through unchanged.
    fn replacement_for(&self, c: char) -> Option<&str> {
        Symbol::from_char(c).and_then(|sym| self.get(sym))
    }

    /// Symbol count of `current` after one more rewrite, without building it.
    ///
    /// Replacements are validated ASCII, so their byte length is their symbol count.
    fn next_len(&self, current: &str) -> usize {
        current
            .chars()
            .map(|c| self.replacement_for(c).map_or(1, str::len))
            .sum()
    }

    fn rewrite(&self, current: &str) -> String {
        let mut next = String::with_capacity(self.next_len(current));
        for c in current.chars() {
            match self.replacement_for(c) {
                Some(replacement) => next.push_str(replacement),
                None => next.push(c),
            }
        }
        next
    }
}

impl TryFrom<BTreeMap<String, String>> for RuleSet {
    type Error = GrammarError;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut rules = RuleSet::new();
        for (key, replacement) in map {
            let mut chars = key.chars();
            let c = match (chars.next(), chars.next()) {
                (Some(c), None) => c,
                _ => return Err(GrammarError::InvalidRuleKey(key)),
            };
            let symbol = Symbol::from_char(c).ok_or(GrammarError::UnknownRuleKey(c))?;
            rules.insert(symbol, replacement)?;
        }
        Ok(rules)
    }
}

impl From<RuleSet> for BTreeMap<String, String> {
    fn from(rules: RuleSet) -> Self {
        Symbol::ALL
            .into_iter()
            .filter_map(|sym| {
                rules
                    .get(sym)
                    .map(|r| (sym.as_char().to_string(), r.to_string()))
            })
            .collect()
    }
}

/// Expands `axiom` by applying `rules` `iterations` times.
///
/// Pure and deterministic. Zero iterations returns the axiom unchanged.
pub fn expand(axiom: &str, rules: &RuleSet, iterations: u32) -> String {
    let mut current = axiom.to_string();
    for iteration in 1..=iterations {
        current = rules.rewrite(&current);
        trace!(iteration, symbols = current.chars().count(), "expanded");
    }
    current
}

/// An axiom together with the rules that rewrite it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub axiom: String,
    pub rules: RuleSet,
}

impl Grammar {
    pub fn new(axiom: impl Into<String>, rules: RuleSet) -> Self {
        Self {
            axiom: axiom.into(),
            rules,
        }
    }

    pub fn expand(&self, iterations: u32) -> String {
        expand(&self.axiom, &self.rules, iterations)
    }

    /// Like [`expand`](Self::expand), but refuses to build a string longer than `max_symbols`.
    ///
    /// The length of each iteration is computed before it is allocated, so a runaway grammar
    /// fails fast instead of exhausting memory.
    pub fn expand_bounded(
        &self,
        iterations: u32,
        max_symbols: usize,
    ) -> Result<String, GrammarError> {
        let mut current = self.axiom.clone();
        for iteration in 1..=iterations {
            let length = self.rules.next_len(&current);
            if length > max_symbols {
                return Err(GrammarError::ExpansionLimit {
                    iteration,
                    length,
                    limit: max_symbols,
                });
            }
            current = self.rules.rewrite(&current);
            trace!(iteration, symbols = current.chars().count(), "expanded");
        }
        debug!(
            iterations,
            symbols = current.chars().count(),
            "grammar expansion finished"
        );
        Ok(current)
    }
}
