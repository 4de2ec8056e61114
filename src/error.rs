//! Error type shared by config loading, seed handling and session glue.

use crate::constants::{SEED_MAX, SEED_MIN};

#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    #[error("seed 0 is reserved for the pending state")]
    ZeroSeed,
    #[error("seed {0} is outside [{min}, {max})", min = SEED_MIN, max = SEED_MAX)]
    SeedOutOfRange(u32),
    #[error("replicated seed went back to pending after {previous}")]
    SeedReset { previous: u32 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

pub type ArenaResult<T> = Result<T, ArenaError>;
