//! Short dead-end branches carved after the two diagonals.

use serde::{Deserialize, Serialize};

use super::carve::carve;
use super::grid::Grid;
use super::rng::ArenaRng;
use crate::config::GenerationConfig;
use crate::constants::BRANCH_ATTEMPT_LIMIT;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchReport {
    pub added: u32,
    pub attempts: u32,
}

/// Carve up to `extra_branches` branches within `BRANCH_ATTEMPT_LIMIT` attempts.
///
/// Per attempt the stream yields x, y of an interior cell; if that cell is
/// still a wall, two more draws give the target offset in
/// `[-branch_length, branch_length]` per axis, clamped into the interior.
/// Sampling an Empty cell burns the attempt without counting.
pub fn add_dead_ends(grid: &mut Grid, config: &GenerationConfig, rng: &mut ArenaRng) -> BranchReport {
    let mut report = BranchReport::default();

    // Interior is x in [1, W-2], y in [1, H-2]
    if grid.width() < 3 || grid.height() < 3 {
        return report;
    }
    let max_x = (grid.width() - 2) as i32;
    let max_y = (grid.height() - 2) as i32;
    let reach = config.branch_length as i32;

    while report.added < config.extra_branches && report.attempts < BRANCH_ATTEMPT_LIMIT {
        report.attempts += 1;
        let rx = rng.range_inclusive(1, max_x);
        let ry = rng.range_inclusive(1, max_y);
        if grid.is_empty(rx as usize, ry as usize) {
            continue;
        }

        let tx = (rx + rng.range_inclusive(-reach, reach)).clamp(1, max_x);
        let ty = (ry + rng.range_inclusive(-reach, reach)).clamp(1, max_y);
        carve(
            grid,
            (rx as usize, ry as usize),
            (tx as usize, ty as usize),
            rng,
        );
        report.added += 1;
    }

    if report.added < config.extra_branches {
        tracing::debug!(
            requested = config.extra_branches,
            added = report.added,
            attempts = report.attempts,
            "branch attempt budget exhausted"
        );
    }

    report
}
