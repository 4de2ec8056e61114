//! Rift Arena - seed-replicated arena generation
//!
//! Every participant rebuilds the same maze-like arena from one replicated
//! seed:
//! - Deterministic generation (seeded xoshiro stream, fill + carve + branches)
//! - Single-writer seed replication with change notifications
//! - Once-per-process generation guard shared by every trigger
//! - Session-local geometry, spawn corners and red/blue dimensions

pub mod config;
pub mod constants;
pub mod dimension;
pub mod error;
pub mod generation;
pub mod logging;
pub mod replication;
pub mod session;
pub mod spawn;
pub mod visualization;

pub use config::{ArenaConfig, GenerationConfig, Role, SessionConfig};
pub use error::{ArenaError, ArenaResult};
pub use generation::grid::{CellState, Grid};
pub use generation::{generate_arena, Arena, Seed};
pub use replication::{ReplicatedSeed, SeedChange, SeedReader, SeedWriter};
pub use session::{GenerationOutcome, Participant};
