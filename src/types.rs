//! Core data types for the engine.
//!
//! All grid types use flat `Vec` storage in row-major layout:
//! `cells[y * width + x]`.

use serde::{Deserialize, Serialize};

/// Visibility of a single cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    Unknown,
    Revealed,
    Flagged,
}

/// Outcome of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    Playing,
    Won,
    Lost,
}

/// Sentinel count value for mine cells in a [`CountGrid`].
pub const MINE: i8 = -1;

/// The 8-neighborhood of (x, y), clipped to a width x height grid.
pub fn neighbors(x: usize, y: usize, width: usize, height: usize) -> Vec<(usize, usize)> {
    let mut coords = Vec::with_capacity(8);
    for dy in -1i32..=1 {
        for dx in -1i32..=1 {
            if dx == 0 && dy == 0 {
                continue;
            }
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;
            if nx >= 0 && nx < width as i32 && ny >= 0 && ny < height as i32 {
                coords.push((nx as usize, ny as usize));
            }
        }
    }
    coords
}

/// Per-cell visibility state.
#[derive(Clone, Debug)]
pub struct StateGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<CellState>,
}

impl StateGrid {
    /// Create a new grid with all cells unknown.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![CellState::Unknown; width * height],
        }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<CellState>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> CellState {
        self.cells[y * self.width + x]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, state: CellState) {
        self.cells[y * self.width + x] = state;
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }
}

/// Adjacent-mine counts: 0-8 for ordinary cells, [`MINE`] for mine cells.
#[derive(Clone, Debug)]
pub struct CountGrid {
    pub width: usize,
    pub height: usize,
    cells: Vec<i8>,
}

impl CountGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    pub fn from_cells(width: usize, height: usize, cells: Vec<i8>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> i8 {
        self.cells[y * self.width + x]
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, count: i8) {
        self.cells[y * self.width + x] = count;
    }

    pub fn cells(&self) -> &[i8] {
        &self.cells
    }
}

/// Mine positions as a dense bitmap.
#[derive(Clone, Debug)]
pub struct MineMap {
    pub width: usize,
    pub height: usize,
    cells: Vec<u8>,
}

impl MineMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![0; width * height],
        }
    }

    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x] != 0
    }

    #[inline(always)]
    pub fn set(&mut self, x: usize, y: usize, mine: bool) {
        self.cells[y * self.width + x] = mine as u8;
    }

    /// Count of mines on the board.
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|&&v| v != 0).count()
    }

    /// Mine coordinates in row-major order.
    pub fn positions(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

/// Pre-computed neighborhood for every cell of a grid.
///
/// Stores the 8-directional neighbors (clipped to bounds) for every cell.
/// Indexed by `y * width + x`; each entry is a slice of `(nx, ny)` pairs.
#[derive(Debug)]
pub struct NeighborCache {
    pub width: usize,
    pub height: usize,
    /// Flat storage of all neighbor pairs.
    data: Vec<(usize, usize)>,
    /// offsets[i] = start index in `data` for cell i; a trailing sentinel
    /// makes offsets[i + 1] always valid.
    offsets: Vec<usize>,
}

impl NeighborCache {
    /// Build the cache for a grid of the given dimensions.
    pub fn new(width: usize, height: usize) -> Self {
        let total = width * height;
        let mut data = Vec::with_capacity(total * 8);
        let mut offsets = Vec::with_capacity(total + 1);

        for y in 0..height {
            for x in 0..width {
                offsets.push(data.len());
                data.extend(neighbors(x, y, width, height));
            }
        }
        offsets.push(data.len());

        Self {
            width,
            height,
            data,
            offsets,
        }
    }

    /// Neighbors of cell (x, y).
    #[inline(always)]
    pub fn get(&self, x: usize, y: usize) -> &[(usize, usize)] {
        let idx = y * self.width + x;
        &self.data[self.offsets[idx]..self.offsets[idx + 1]]
    }
}
