//! Biased random-walk carving between two cells.

use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::rng::ArenaRng;
use crate::constants::COIN_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarveOutcome {
    pub steps: usize,
    /// False when the walk hit the `width * height` step bound first.
    /// The target cell is cleared either way.
    pub reached_target: bool,
}

/// Walk from `start` toward `end`, clearing every visited cell.
///
/// Each step draws once: above the threshold with X unaligned steps X,
/// otherwise steps Y if Y is unaligned (a step can be spent standing still).
/// Both points must be in bounds.
pub fn carve(
    grid: &mut Grid,
    start: (usize, usize),
    end: (usize, usize),
    rng: &mut ArenaRng,
) -> CarveOutcome {
    debug_assert!(grid.in_bounds(start.0, start.1) && grid.in_bounds(end.0, end.1));

    let max_steps = grid.width() * grid.height();
    let (mut x, mut y) = start;
    let mut steps = 0;

    while (x, y) != end && steps < max_steps {
        steps += 1;
        grid.clear(x, y);
        if rng.unit() > COIN_THRESHOLD && x != end.0 {
            x = step_toward(x, end.0);
        } else if y != end.1 {
            y = step_toward(y, end.1);
        }
    }
    grid.clear(end.0, end.1);

    let reached_target = (x, y) == end;
    if !reached_target {
        tracing::debug!(
            ?start,
            ?end,
            steps,
            "carve hit step bound, forcing target cell empty"
        );
    }

    CarveOutcome {
        steps,
        reached_target,
    }
}

fn step_toward(from: usize, to: usize) -> usize {
    if to > from {
        from + 1
    } else {
        from - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::generation::grid::CellState;
    use crate::generation::Seed;

    fn walled(width: u32, height: u32, seed: u32) -> (Grid, ArenaRng) {
        let config = GenerationConfig {
            width,
            height,
            ..Default::default()
        };
        let mut rng = ArenaRng::reseed(Seed::try_from(seed).unwrap());
        let grid = Grid::build(&config, &mut rng);
        (grid, rng)
    }

    #[test]
    fn test_clears_both_endpoints() {
        let (mut grid, mut rng) = walled(10, 8, 1111);
        let outcome = carve(&mut grid, (0, 0), (9, 7), &mut rng);
        assert!(grid.is_empty(0, 0));
        assert!(grid.is_empty(9, 7));
        assert!(outcome.reached_target);
        assert!(outcome.steps >= 9 + 7, "manhattan distance is a lower bound");
    }

    #[test]
    fn test_walk_is_monotone_toward_target() {
        // Every cleared cell must lie inside the start/end bounding box
        let (mut grid, mut rng) = walled(12, 12, 2222);
        carve(&mut grid, (2, 9), (8, 3), &mut rng);
        for (x, y, cell) in grid.iter() {
            if cell == CellState::Empty {
                assert!((2..=8).contains(&x) && (3..=9).contains(&y), "({x},{y})");
            }
        }
    }

    #[test]
    fn test_start_equals_end_clears_single_cell() {
        let (mut grid, mut rng) = walled(5, 5, 3333);
        let draws_before = rng.draws();
        let outcome = carve(&mut grid, (2, 2), (2, 2), &mut rng);
        assert_eq!(outcome.steps, 0);
        assert!(outcome.reached_target);
        assert_eq!(rng.draws(), draws_before);
        assert_eq!(grid.count(CellState::Empty), 1);
    }

    #[test]
    fn test_step_bound_forces_target() {
        // A 1-wide column still has room: bound is width*height = 6 >= 5 steps
        let (mut grid, mut rng) = walled(1, 6, 4444);
        let outcome = carve(&mut grid, (0, 0), (0, 5), &mut rng);
        assert!(outcome.reached_target);
        assert_eq!(grid.count(CellState::Empty), 6);

        // Long walk on a wide-short grid may exhaust width*height; target is still cleared
        let (mut grid, mut rng) = walled(30, 1, 5555);
        let outcome = carve(&mut grid, (0, 0), (29, 0), &mut rng);
        assert!(outcome.steps <= 30);
        assert!(grid.is_empty(29, 0));
    }

    #[test]
    fn test_step_toward() {
        assert_eq!(step_toward(3, 7), 4);
        assert_eq!(step_toward(3, 0), 2);
    }
}
