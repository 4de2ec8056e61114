//! Deterministic arena generation.
//!
//! One seed drives a fixed sequence of draws: grid fill, two diagonal
//! carves, then dead-end branches. Same seed and config produce the same
//! grid on every participant.

pub mod branches;
pub mod carve;
pub mod grid;
pub mod rng;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::constants::{PENDING_SEED, SEED_MAX, SEED_MIN};
use crate::error::ArenaError;
use crate::logging::TimingSpan;

use branches::{add_dead_ends, BranchReport};
use carve::{carve, CarveOutcome};
use grid::Grid;
use rng::ArenaRng;

pub struct GenerationPlugin {
    pub config: GenerationConfig,
}

impl Plugin for GenerationPlugin {
    fn build(&self, app: &mut App) {
        // The session may already have installed the config its participant builds from
        match app.world().get_resource::<GenerationConfig>() {
            Some(installed) if *installed != self.config => error!(
                installed = %format!("{:016x}", installed.fingerprint()),
                ignored = %format!("{:016x}", self.config.fingerprint()),
                "GenerationConfig already installed, keeping it"
            ),
            Some(_) => {}
            None => {
                app.insert_resource(self.config.clone());
            }
        }
        app.add_event::<ArenaGenerated>();
    }
}

/// Session seed - the only value that crosses the wire.
/// Always in [1000, 9999); the pending sentinel 0 cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Seed(u32);

impl Seed {
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Seed {
    type Error = ArenaError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            PENDING_SEED => Err(ArenaError::ZeroSeed),
            SEED_MIN..SEED_MAX => Ok(Self(raw)),
            _ => Err(ArenaError::SeedOutOfRange(raw)),
        }
    }
}

impl From<Seed> for u32 {
    fn from(seed: Seed) -> Self {
        seed.0
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub diagonals: [CarveOutcome; 2],
    pub branches: BranchReport,
    pub draws: u64,
}

/// A finished arena. Owned by the participant that built it, never shared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub seed: Seed,
    pub grid: Grid,
    pub report: GenerationReport,
}

/// Fired on the local participant after its one generation run
#[derive(Event, Debug, Clone)]
pub struct ArenaGenerated {
    pub seed: Seed,
    pub grid: Grid,
}

/// Build the arena for `seed`.
///
/// Fixed draw order: fill, diagonal (0,0)->(W-1,H-1), diagonal
/// (0,H-1)->(W-1,0), dead ends. The stream is created here and dropped on
/// return. `config` must already be validated.
pub fn generate_arena(seed: Seed, config: &GenerationConfig) -> Arena {
    debug_assert!(config.validate().is_ok(), "generate_arena needs a validated config");
    let _span = TimingSpan::new("generate_arena");
    info!(
        seed = seed.value(),
        width = config.width,
        height = config.height,
        "Generating arena"
    );

    let mut rng = ArenaRng::reseed(seed);
    let mut grid = Grid::build(config, &mut rng);

    let last_x = grid.width() - 1;
    let last_y = grid.height() - 1;
    let diagonals = [
        carve(&mut grid, (0, 0), (last_x, last_y), &mut rng),
        carve(&mut grid, (0, last_y), (last_x, 0), &mut rng),
    ];
    let branches = add_dead_ends(&mut grid, config, &mut rng);
    let draws = rng.draws();

    info!(
        seed = seed.value(),
        fingerprint = %format!("{:016x}", grid.fingerprint()),
        branches = branches.added,
        draws,
        "Arena generated"
    );

    Arena {
        seed,
        grid,
        report: GenerationReport {
            diagonals,
            branches,
            draws,
        },
    }
}
