use crate::config::ConfigError;
use crate::grammar::GrammarError;
use crate::interpreter::InterpretError;
use thiserror::Error;

/// Any failure of a full generation pass.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error(transparent)]
    Interpret(#[from] InterpretError),
}

pub type Result<T> = std::result::Result<T, Error>;
