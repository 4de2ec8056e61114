//! Cell grid and the initial random fill.

use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use super::rng::ArenaRng;
use crate::config::GenerationConfig;
use crate::constants::COIN_THRESHOLD;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    WallKindA,
    WallKindB,
    Empty,
}

impl CellState {
    pub fn is_wall(&self) -> bool {
        !matches!(self, Self::Empty)
    }

    pub fn as_char(&self) -> char {
        match self {
            Self::WallKindA => 'A',
            Self::WallKindB => 'B',
            Self::Empty => '.',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Self::WallKindA),
            'B' => Some(Self::WallKindB),
            '.' => Some(Self::Empty),
            _ => None,
        }
    }

    fn as_byte(&self) -> u8 {
        match self {
            Self::WallKindA => 1,
            Self::WallKindB => 2,
            Self::Empty => 0,
        }
    }
}

/// W x H cells, stored row-major (`y * width + x`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<CellState>,
}

impl Grid {
    /// Fill every cell from the stream, row by row (y outer, x inner), one draw each.
    /// No cell starts Empty.
    pub fn build(config: &GenerationConfig, rng: &mut ArenaRng) -> Self {
        let width = config.width_cells();
        let height = config.height_cells();
        let mut cells = Vec::with_capacity(width * height);
        for _y in 0..height {
            for _x in 0..width {
                let cell = if rng.unit() > COIN_THRESHOLD {
                    CellState::WallKindA
                } else {
                    CellState::WallKindB
                };
                cells.push(cell);
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Parse the `to_ascii` layout back into a grid (fixtures, debugging)
    pub fn from_ascii(text: &str) -> Option<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let height = rows.len();
        let width = rows.first()?.chars().count();
        let mut cells = Vec::with_capacity(width * height);
        for row in &rows {
            if row.chars().count() != width {
                return None;
            }
            for c in row.chars() {
                cells.push(CellState::from_char(c)?);
            }
        }
        Some(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<CellState> {
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(self.cells[y * self.width + x])
    }

    pub fn is_empty(&self, x: usize, y: usize) -> bool {
        self.get(x, y) == Some(CellState::Empty)
    }

    /// Mark a cell passable. Out-of-bounds coordinates are ignored.
    pub fn clear(&mut self, x: usize, y: usize) {
        if self.in_bounds(x, y) {
            self.cells[y * self.width + x] = CellState::Empty;
        }
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }

    /// `(x, y, state)` in storage order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| (i % width, i / width, cell))
    }

    /// One line per row, y ascending: 'A', 'B', '.'
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.cells.chunks(self.width) {
            out.extend(row.iter().map(CellState::as_char));
            out.push('\n');
        }
        out
    }

    /// Truncated sha3 of dimensions + cells; equal grids give equal fingerprints
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Sha3_256::new();
        hasher.update((self.width as u64).to_le_bytes());
        hasher.update((self.height as u64).to_le_bytes());
        let bytes: Vec<u8> = self.cells.iter().map(CellState::as_byte).collect();
        hasher.update(&bytes);
        let digest = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(head)
    }
}
