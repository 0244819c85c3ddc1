//! # symbios-blossom
//!
//! An engine-agnostic procedural tree generator for the Symbios ecosystem.
//!
//! Generation runs in two stages. A [`Grammar`] rewrites an axiom through a fixed set of rules
//! for a number of iterations; a [`TurtleInterpreter`] then walks the expanded string with a
//! cursor and a stack of saved states, producing a [`TreeBlueprint`]: an ordered list of
//! branch and blossom placements that any renderer (Bevy, a DCC exporter, a plotter) can
//! instantiate.
//!
//! All randomness is injected. Rotation noise comes from a [`JitterTable`] built once per
//! [`TreeGenerator`], and segment sizes from the [`rand::Rng`] passed to each pass, so a seed
//! reproduces a tree exactly.

pub mod blueprint;
pub mod config;
pub mod error;
pub mod generator;
pub mod grammar;
pub mod interpreter;
pub mod jitter;
pub mod turtle;

pub use blueprint::*;
pub use config::*;
pub use error::{Error, Result};
pub use generator::*;
pub use grammar::*;
pub use interpreter::*;
pub use jitter::*;
pub use turtle::*;
