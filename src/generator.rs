//! The full pipeline: configuration, expansion, interpretation.

use crate::blueprint::TreeBlueprint;
use crate::config::TreeConfig;
use crate::error::Result;
use crate::grammar::{Grammar, GrammarError};
use crate::interpreter::{TurtleInterpreter, UnrecognizedSymbol};
use crate::jitter::JitterTable;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

/// PCG stream used for segment sizing, distinct from the jitter table's.
const SIZING_STREAM: u64 = 0xb10_550;

/// The output of one generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// The expanded symbol string, kept for inspection.
    pub symbols: String,
    pub blueprint: TreeBlueprint,
    pub unrecognized: Vec<UnrecognizedSymbol>,
    /// Deepest branch nesting reached.
    pub max_depth: usize,
}

/// Owns the grammar, turtle settings and the session jitter table.
///
/// The jitter table is created once here and shared read-only by every pass, so repeated
/// passes differ only through the random source handed to [`generate`](Self::generate).
pub struct TreeGenerator {
    grammar: Grammar,
    iterations: u32,
    max_symbols: usize,
    interpreter: TurtleInterpreter,
    jitter: JitterTable,
    seed: u64,
}

impl TreeGenerator {
    /// Validates `config` and builds the jitter table.
    ///
    /// Without `jitter.seed` a seed is drawn at random and logged, so any run can be replayed.
    pub fn new(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        let seed = match config.jitter.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                info!(seed, "no seed configured, drew one at random");
                seed
            }
        };
        let jitter = JitterTable::from_seed(seed, config.jitter.len);

        Ok(Self {
            grammar: config.grammar.grammar(),
            iterations: config.grammar.iterations,
            max_symbols: config.grammar.max_symbols,
            interpreter: TurtleInterpreter::new(config.turtle),
            jitter,
            seed,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn jitter(&self) -> &JitterTable {
        &self.jitter
    }

    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn interpreter(&self) -> &TurtleInterpreter {
        &self.interpreter
    }

    /// Runs only the grammar stage.
    pub fn expand(&self) -> std::result::Result<String, GrammarError> {
        self.grammar
            .expand_bounded(self.iterations, self.max_symbols)
    }

    /// Expands the grammar and interprets it, sizing segments with `rng`.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Generation> {
        let symbols = self.expand()?;
        trace!(%symbols, "expanded symbol string");

        let interpretation = self.interpreter.interpret(&symbols, &self.jitter, rng)?;
        debug!(
            symbols = symbols.chars().count(),
            placements = interpretation.blueprint.len(),
            "generation finished"
        );

        Ok(Generation {
            symbols,
            blueprint: interpretation.blueprint,
            unrecognized: interpretation.unrecognized,
            max_depth: interpretation.max_depth,
        })
    }

    /// [`generate`](Self::generate) with a sizing source derived from the generator's seed.
    ///
    /// Same config and seed always give the same [`Generation`].
    pub fn generate_seeded(&self) -> Result<Generation> {
        self.generate(&mut Pcg32::new(self.seed, SIZING_STREAM))
    }
}
