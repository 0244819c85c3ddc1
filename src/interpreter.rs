//! Interpreter that converts an expanded symbol string into a [`TreeBlueprint`].
//!
//! The entry point is [`TurtleInterpreter`]. Configure it with a [`TurtleConfig`], then call
//! [`TurtleInterpreter::interpret`] with the expanded string, the session [`JitterTable`] and a
//! random source for segment sizing.

use crate::blueprint::{PlacementCommand, PlacementKind, TreeBlueprint};
use crate::grammar::Symbol;
use crate::jitter::JitterTable;
use crate::turtle::{ShrinkParams, TurtleStack, TurtleState};
use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Fixed factor applied to sampled petal lengths to get blossom scale.
pub const BLOSSOM_SCALE: f32 = 0.1;

/// Default maximum stack depth for push/pop operations.
pub const DEFAULT_MAX_STACK_DEPTH: usize = 1024;

/// Errors that abort an interpretation pass.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InterpretError {
    #[error("malformed structure: `]` at index {index} with no matching `[`")]
    MalformedStructure { index: usize },

    #[error("malformed structure: {depth} `[` left unclosed at end of string")]
    UnclosedBranch { depth: usize },

    #[error("`[` at index {index} exceeds maximum stack depth {max_depth}")]
    StackOverflow { index: usize, max_depth: usize },
}

/// A character outside the turtle alphabet. Reported and skipped, never fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[error("unrecognized symbol `{symbol}` at index {index}")]
pub struct UnrecognizedSymbol {
    pub symbol: char,
    pub index: usize,
}

/// How the blossom heuristic looks past the end of the string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookaheadMode {
    /// Offsets wrap to the start of the string.
    #[default]
    Wrapping,
    /// Offsets past the end never match.
    Bounded,
}

/// Configuration for turtle interpretation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurtleConfig {
    /// Base rotation angle in degrees.
    pub angle: f32,
    /// Starting branch width.
    pub width: f32,
    pub min_petal_length: f32,
    pub max_petal_length: f32,
    pub min_branch_length: f32,
    pub max_branch_length: f32,
    /// Rotation noise in percent of `angle`.
    pub variance: f32,
    #[serde(default)]
    pub lookahead: LookaheadMode,
    /// Maximum stack depth for push/pop operations.
    #[serde(default = "default_max_stack_depth")]
    pub max_stack_depth: usize,
    pub shrink: ShrinkParams,
}

fn default_max_stack_depth() -> usize {
    DEFAULT_MAX_STACK_DEPTH
}

/// The result of a successful pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub blueprint: TreeBlueprint,
    /// Skipped characters, in string order.
    pub unrecognized: Vec<UnrecognizedSymbol>,
    /// Turtle state after the last symbol.
    pub final_state: TurtleState,
    /// Deepest stack depth reached.
    pub max_depth: usize,
}

/// Walks a symbol string and emits placements.
pub struct TurtleInterpreter {
    config: TurtleConfig,
}

impl TurtleInterpreter {
    pub fn new(config: TurtleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TurtleConfig {
        &self.config
    }

    /// The state every pass starts from: origin, identity rotation, configured width and bounds.
    pub fn initial_state(&self) -> TurtleState {
        TurtleState::new(
            self.config.width,
            self.config.min_branch_length,
            self.config.max_branch_length,
        )
    }

    /// Interprets `symbols` and returns the resulting placements.
    ///
    /// Index `i` in the string (counted in characters) selects jitter entry `i % len`.
    ///
    /// # Segments
    ///
    /// Each `F` becomes one [`PlacementCommand`] at the turtle's current transform. It is a
    /// blossom when the next symbol is `X`, or when the symbols three and four ahead are `F`
    /// and `X`; otherwise it is a branch. A branch of sampled length `l` is scaled
    /// `(width, l, width)` and moves the turtle `2 × l` along its up axis. A blossom is scaled
    /// uniformly by a sampled petal length times [`BLOSSOM_SCALE`] and does not move the turtle.
    ///
    /// # Push / Pop
    ///
    /// `[` saves the full [`TurtleState`] and then shrinks width and length bounds; `]` restores
    /// the saved state. A `]` with nothing to pop aborts with
    /// [`InterpretError::MalformedStructure`], as does a string ending with open branches.
    ///
    /// # Unknown characters
    ///
    /// Logged, collected into [`Interpretation::unrecognized`] and skipped.
    pub fn interpret<R: Rng>(
        &self,
        symbols: &str,
        jitter: &JitterTable,
        rng: &mut R,
    ) -> Result<Interpretation, InterpretError> {
        let chars: Vec<char> = symbols.chars().collect();
        let mut blueprint = TreeBlueprint::new();
        let mut unrecognized = Vec::new();
        let mut turtle = self.initial_state();
        let mut stack = TurtleStack::new(self.config.max_stack_depth);
        let mut max_depth = 0;

        for (i, &c) in chars.iter().enumerate() {
            let Some(symbol) = Symbol::from_char(c) else {
                warn!(symbol = %c, index = i, "skipping unrecognized symbol");
                unrecognized.push(UnrecognizedSymbol {
                    symbol: c,
                    index: i,
                });
                continue;
            };

            match symbol {
                Symbol::Segment => {
                    let command = if self.is_blossom(&chars, i) {
                        let petal = sample(
                            rng,
                            self.config.min_petal_length,
                            self.config.max_petal_length,
                        );
                        PlacementCommand {
                            kind: PlacementKind::Blossom,
                            position: turtle.cursor.position,
                            rotation: turtle.cursor.rotation,
                            scale: Vec3::splat(petal * BLOSSOM_SCALE),
                        }
                    } else {
                        let length =
                            sample(rng, turtle.min_branch_length, turtle.max_branch_length);
                        let command = PlacementCommand {
                            kind: PlacementKind::Branch,
                            position: turtle.cursor.position,
                            rotation: turtle.cursor.rotation,
                            scale: Vec3::new(turtle.width, length, turtle.width),
                        };
                        turtle.cursor.advance(2.0 * length);
                        command
                    };
                    blueprint.push(command);
                }
                Symbol::Bud => {}
                Symbol::YawLeft => turtle.cursor.rotate_local_z(self.turn_angle(jitter, i)),
                Symbol::YawRight => turtle.cursor.rotate_local_z(-self.turn_angle(jitter, i)),
                Symbol::RollLeft => turtle.cursor.rotate_local_y(self.turn_angle(jitter, i)),
                Symbol::RollRight => turtle.cursor.rotate_local_y(-self.turn_angle(jitter, i)),
                Symbol::Push => {
                    if !stack.push(turtle) {
                        return Err(InterpretError::StackOverflow {
                            index: i,
                            max_depth: self.config.max_stack_depth,
                        });
                    }
                    max_depth = max_depth.max(stack.depth());
                    turtle.shrink(&self.config.shrink);
                }
                Symbol::Pop => {
                    turtle = stack
                        .pop()
                        .ok_or(InterpretError::MalformedStructure { index: i })?;
                }
            }
        }

        if !stack.is_empty() {
            return Err(InterpretError::UnclosedBranch {
                depth: stack.depth(),
            });
        }

        debug!(
            placements = blueprint.len(),
            branches = blueprint.branches().count(),
            blossoms = blueprint.blossoms().count(),
            unrecognized = unrecognized.len(),
            max_depth,
            "interpretation finished"
        );

        Ok(Interpretation {
            blueprint,
            unrecognized,
            final_state: turtle,
            max_depth,
        })
    }

    /// `angle × (1 + variance/100 × jitter[i])`, in radians.
    fn turn_angle(&self, jitter: &JitterTable, index: usize) -> f32 {
        let factor = 1.0 + self.config.variance / 100.0 * jitter.get(index);
        (self.config.angle * factor).to_radians()
    }

    /// Whether the `F` at `index` is the last segment before a bud.
    fn is_blossom(&self, chars: &[char], index: usize) -> bool {
        let at = |offset: usize, expected: char| -> bool {
            let target = index + offset;
            match self.config.lookahead {
                LookaheadMode::Wrapping => chars[target % chars.len()] == expected,
                LookaheadMode::Bounded => chars.get(target) == Some(&expected),
            }
        };
        at(1, 'X') || (at(3, 'F') && at(4, 'X'))
    }
}

/// Uniform sample in `[min, max]`; an empty or NaN range yields `min`.
///
/// Never computes `max - min` directly, so bounds near `±f32::MAX` cannot overflow the span.
/// A sample that still comes out non-finite collapses to whichever bound is finite.
fn sample<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if min.is_nan() || max.is_nan() || min >= max {
        return min;
    }
    let t: f32 = rng.random();
    let value = min * (1.0 - t) + max * t;
    if value.is_finite() {
        value.clamp(min, max)
    } else if min.is_finite() {
        min
    } else if max.is_finite() {
        max
    } else {
        0.0
    }
}
