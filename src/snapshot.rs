//! JSON snapshots of the full game state.
//!
//! A snapshot captures everything needed to resume: dimensions, the RNG
//! seed, per-cell visibility, mine positions, and the count grid. Mines
//! are `None` when the first click has not happened yet.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::Board;
use crate::rng::GameRng;
use crate::types::{CellState, CountGrid, GameState, MineMap, NeighborCache, StateGrid};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot format: {0}")]
    Format(#[from] serde_json::Error),
    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

#[derive(Serialize, Deserialize)]
struct SnapshotData {
    width: usize,
    height: usize,
    num_mines: usize,
    seed: Option<u64>,
    first_click_done: bool,
    game_state: GameState,
    revealed_count: usize,
    flag_count: usize,
    /// Row-major cell states.
    state: Vec<CellState>,
    /// Mine coordinates in row-major order; `None` before placement.
    mines: Option<Vec<(usize, usize)>>,
    /// Row-major count grid; `None` before placement.
    counts: Option<Vec<i8>>,
}

/// Write the board state to `path` as pretty-printed JSON.
pub fn save(board: &Board, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let data = SnapshotData {
        width: board.width(),
        height: board.height(),
        num_mines: board.num_mines(),
        seed: board.rng.seed(),
        first_click_done: board.first_click_done,
        game_state: board.game_state(),
        revealed_count: board.revealed_count(),
        flag_count: board.flag_count(),
        state: board.state.cells().to_vec(),
        mines: board.mines.as_ref().map(|m| m.positions()),
        counts: board.counts.as_ref().map(|c| c.cells().to_vec()),
    };
    let json = serde_json::to_string_pretty(&data)?;
    fs::write(path, json)?;
    Ok(())
}

/// Restore a board from a snapshot file.
pub fn load(path: impl AsRef<Path>) -> Result<Board, SnapshotError> {
    let json = fs::read_to_string(path)?;
    let data: SnapshotData = serde_json::from_str(&json)?;

    let cell_count = data.width * data.height;
    if data.state.len() != cell_count {
        return Err(SnapshotError::Invalid(format!(
            "state grid has {} cells, expected {}",
            data.state.len(),
            cell_count
        )));
    }
    if let Some(counts) = &data.counts {
        if counts.len() != cell_count {
            return Err(SnapshotError::Invalid(format!(
                "count grid has {} cells, expected {}",
                counts.len(),
                cell_count
            )));
        }
    }

    let mines = match &data.mines {
        Some(positions) => {
            let mut map = MineMap::new(data.width, data.height);
            for &(x, y) in positions {
                if x >= data.width || y >= data.height {
                    return Err(SnapshotError::Invalid(format!(
                        "mine at ({x}, {y}) is out of bounds"
                    )));
                }
                map.set(x, y, true);
            }
            Some(map)
        }
        None => None,
    };

    Ok(Board {
        width: data.width,
        height: data.height,
        num_mines: data.num_mines,
        rng: GameRng::from_seed_opt(data.seed),
        neighbor_cache: NeighborCache::new(data.width, data.height),
        state: StateGrid::from_cells(data.width, data.height, data.state),
        mines,
        counts: data
            .counts
            .map(|c| CountGrid::from_cells(data.width, data.height, c)),
        first_click_done: data.first_click_done,
        game_state: data.game_state,
        revealed_count: data.revealed_count,
        flag_count: data.flag_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("minemind_{}_{}.json", name, std::process::id()))
    }

    #[test]
    fn roundtrip_preserves_game_state() {
        let mut board = Board::with_mines(4, 3, &[(0, 0), (3, 2)]);
        board.open(2, 1);
        board.flag(0, 0);

        let path = temp_path("roundtrip");
        save(&board, &path).unwrap();
        let restored = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(restored.width(), 4);
        assert_eq!(restored.height(), 3);
        assert_eq!(restored.num_mines(), 2);
        assert_eq!(restored.game_state(), board.game_state());
        assert_eq!(restored.flag_count(), 1);
        assert_eq!(restored.revealed_count(), board.revealed_count());
        for y in 0..3 {
            for x in 0..4 {
                assert_eq!(restored.get_state(x, y), board.get_state(x, y));
                assert_eq!(restored.get_count(x, y), board.get_count(x, y));
                assert_eq!(restored.is_mine(x, y), board.is_mine(x, y));
            }
        }
    }

    #[test]
    fn roundtrip_before_first_click() {
        let board = Board::new(5, 5, 4, GameRng::seeded(99));
        let path = temp_path("fresh");
        save(&board, &path).unwrap();
        let restored = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(!restored.first_click_done);
        assert_eq!(restored.get_count(0, 0), None);
        assert_eq!(restored.rng.seed(), Some(99));
    }

    #[test]
    fn restored_board_keeps_playing() {
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(1, 1);

        let path = temp_path("playing");
        save(&board, &path).unwrap();
        let mut restored = load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let (success, _) = restored.open(2, 2);
        assert!(success);
        assert_eq!(restored.game_state(), GameState::Won);
    }

    #[test]
    fn malformed_json_is_a_format_error() {
        let path = temp_path("garbage");
        fs::write(&path, "not json").unwrap();
        let err = load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, SnapshotError::Format(_)));
    }

    #[test]
    fn mismatched_grid_is_invalid() {
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(2, 2);

        let path = temp_path("mismatch");
        save(&board, &path).unwrap();
        let json = fs::read_to_string(&path).unwrap();
        let truncated = json.replacen("\"width\": 3", "\"width\": 4", 1);
        fs::write(&path, truncated).unwrap();

        let err = load(&path).unwrap_err();
        fs::remove_file(&path).unwrap();
        assert!(matches!(err, SnapshotError::Invalid(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load(temp_path("does_not_exist")).unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
    }
}
