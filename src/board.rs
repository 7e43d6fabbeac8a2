//! Board mechanics: first-click-safe mine placement, flood-fill reveal,
//! flags, chording, and win/lose tracking.
//!
//! Mines are placed on the first `open`, never on the clicked cell or its
//! neighbors. The solver consumes the board through its read-only
//! accessors and mutates it only via `open` and `flag`.

use std::collections::HashSet;

use crate::rng::GameRng;
use crate::types::{CellState, CountGrid, GameState, MineMap, NeighborCache, StateGrid, MINE};

#[derive(Debug)]
pub struct Board {
    pub(crate) width: usize,
    pub(crate) height: usize,
    pub(crate) num_mines: usize,
    pub(crate) rng: GameRng,
    pub(crate) neighbor_cache: NeighborCache,
    pub(crate) state: StateGrid,
    pub(crate) mines: Option<MineMap>,
    pub(crate) counts: Option<CountGrid>,
    pub(crate) first_click_done: bool,
    pub(crate) game_state: GameState,
    pub(crate) revealed_count: usize,
    pub(crate) flag_count: usize,
}

impl Board {
    /// New board with all cells unknown; mines are placed lazily on the
    /// first `open`.
    pub fn new(width: usize, height: usize, num_mines: usize, rng: GameRng) -> Self {
        Self {
            width,
            height,
            num_mines,
            rng,
            neighbor_cache: NeighborCache::new(width, height),
            state: StateGrid::new(width, height),
            mines: None,
            counts: None,
            first_click_done: false,
            game_state: GameState::Playing,
            revealed_count: 0,
            flag_count: 0,
        }
    }

    /// Board with an explicit mine layout, placed immediately.
    ///
    /// Intended for crafted positions and tests; `open` never relocates
    /// these mines.
    pub fn with_mines(width: usize, height: usize, mine_cells: &[(usize, usize)]) -> Self {
        let mut board = Self::new(width, height, mine_cells.len(), GameRng::seeded(0));
        let mut mines = MineMap::new(width, height);
        for &(x, y) in mine_cells {
            mines.set(x, y, true);
        }
        board.counts = Some(compute_counts(&mines, &board.neighbor_cache));
        board.mines = Some(mines);
        board.first_click_done = true;
        board
    }

    /// Open cell (x, y).
    ///
    /// Returns `(success, revealed_cells)`; success is false iff a mine
    /// was revealed. Out-of-bounds or non-unknown cells reveal nothing.
    pub fn open(&mut self, x: usize, y: usize) -> (bool, HashSet<(usize, usize)>) {
        if !self.in_bounds(x, y) {
            return (false, HashSet::new());
        }
        if self.state.get(x, y) != CellState::Unknown {
            return (true, HashSet::new());
        }

        if !self.first_click_done {
            self.place_mines(x, y);
            self.first_click_done = true;
        }

        if self.mines.as_ref().is_some_and(|m| m.get(x, y)) {
            self.state.set(x, y, CellState::Revealed);
            self.game_state = GameState::Lost;
            return (false, HashSet::from([(x, y)]));
        }

        let revealed = self.flood_fill(x, y);
        self.revealed_count += revealed.len();

        if self.revealed_count == self.width * self.height - self.num_mines {
            self.game_state = GameState::Won;
        }

        (true, revealed)
    }

    /// Toggle a flag at (x, y). Returns whether the flag state changed.
    pub fn flag(&mut self, x: usize, y: usize) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        match self.state.get(x, y) {
            CellState::Unknown => {
                self.state.set(x, y, CellState::Flagged);
                self.flag_count += 1;
                true
            }
            CellState::Flagged => {
                self.state.set(x, y, CellState::Unknown);
                self.flag_count -= 1;
                true
            }
            CellState::Revealed => false,
        }
    }

    /// Chord at (x, y): if the cell is a revealed number whose flagged
    /// neighbors match its count, open all unflagged unknown neighbors.
    pub fn chord(&mut self, x: usize, y: usize) -> (bool, HashSet<(usize, usize)>) {
        if !self.in_bounds(x, y) || self.state.get(x, y) != CellState::Revealed {
            return (true, HashSet::new());
        }
        let count = match self.get_count(x, y) {
            Some(c) if c > 0 => c,
            _ => return (true, HashSet::new()),
        };

        let neighbors: Vec<(usize, usize)> = self.neighbor_cache.get(x, y).to_vec();
        let flagged = neighbors
            .iter()
            .filter(|&&(nx, ny)| self.state.get(nx, ny) == CellState::Flagged)
            .count();
        if flagged as i8 != count {
            return (true, HashSet::new());
        }

        let mut all_revealed = HashSet::new();
        for (nx, ny) in neighbors {
            if self.state.get(nx, ny) == CellState::Unknown {
                let (success, revealed) = self.open(nx, ny);
                all_revealed.extend(revealed);
                if !success {
                    return (false, all_revealed);
                }
            }
        }
        (true, all_revealed)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn num_mines(&self) -> usize {
        self.num_mines
    }

    pub fn flag_count(&self) -> usize {
        self.flag_count
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed_count
    }

    pub fn game_state(&self) -> GameState {
        self.game_state
    }

    /// Cell state; out-of-bounds coordinates read as unknown.
    pub fn get_state(&self, x: usize, y: usize) -> CellState {
        if !self.in_bounds(x, y) {
            return CellState::Unknown;
        }
        self.state.get(x, y)
    }

    /// Adjacent-mine count, or `None` before mines are placed or out of
    /// bounds. Mine cells read as [`MINE`].
    pub fn get_count(&self, x: usize, y: usize) -> Option<i8> {
        if !self.in_bounds(x, y) {
            return None;
        }
        self.counts.as_ref().map(|c| c.get(x, y))
    }

    /// Whether (x, y) holds a mine. False before placement.
    pub fn is_mine(&self, x: usize, y: usize) -> bool {
        self.in_bounds(x, y) && self.mines.as_ref().is_some_and(|m| m.get(x, y))
    }

    pub(crate) fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Place mines uniformly at random, excluding the first click and its
    /// neighbors, then compute the count grid.
    fn place_mines(&mut self, first_x: usize, first_y: usize) {
        let mut forbidden: HashSet<(usize, usize)> = HashSet::from([(first_x, first_y)]);
        forbidden.extend(self.neighbor_cache.get(first_x, first_y).iter().copied());

        let mut allowed: Vec<(usize, usize)> = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                if !forbidden.contains(&(x, y)) {
                    allowed.push((x, y));
                }
            }
        }
        self.rng.shuffle(&mut allowed);

        let mut mines = MineMap::new(self.width, self.height);
        for &(x, y) in allowed.iter().take(self.num_mines) {
            mines.set(x, y, true);
        }
        self.counts = Some(compute_counts(&mines, &self.neighbor_cache));
        self.mines = Some(mines);
    }

    /// Flood fill from (x, y): reveal the cell, and when its count is
    /// zero keep revealing unknown neighbors (zeros plus their perimeter).
    fn flood_fill(&mut self, x: usize, y: usize) -> HashSet<(usize, usize)> {
        let mut revealed = HashSet::new();
        let mut stack = vec![(x, y)];
        let mut visited = HashSet::from([(x, y)]);

        while let Some((cx, cy)) = stack.pop() {
            self.state.set(cx, cy, CellState::Revealed);
            revealed.insert((cx, cy));

            if self.counts.as_ref().is_some_and(|c| c.get(cx, cy) == 0) {
                for &(nx, ny) in self.neighbor_cache.get(cx, cy) {
                    if self.state.get(nx, ny) == CellState::Unknown && visited.insert((nx, ny)) {
                        stack.push((nx, ny));
                    }
                }
            }
        }
        revealed
    }
}

/// Neighbor-mine counts for all cells; mine cells get the [`MINE`]
/// sentinel.
fn compute_counts(mines: &MineMap, neighbor_cache: &NeighborCache) -> CountGrid {
    let mut counts = CountGrid::new(mines.width, mines.height);
    for y in 0..mines.height {
        for x in 0..mines.width {
            if mines.get(x, y) {
                counts.set(x, y, MINE);
                continue;
            }
            let count = neighbor_cache
                .get(x, y)
                .iter()
                .filter(|&&(nx, ny)| mines.get(nx, ny))
                .count();
            counts.set(x, y, count as i8);
        }
    }
    counts
}
