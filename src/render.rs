//! ASCII rendering of boards and probability heatmaps.

use std::collections::HashMap;
use std::fmt::Write;

use crate::board::Board;
use crate::types::CellState;

/// Render the board as ASCII: `.` unknown, `F` flag, blank for revealed
/// zeros, digits for numbers, `*` for mines (revealed, or everywhere
/// with `reveal_all`).
pub fn render(board: &Board, reveal_all: bool) -> String {
    let mut out = String::new();
    write_header(&mut out, board.width());

    for y in 0..board.height() {
        let mut row = format!("{y:2}");
        for x in 0..board.width() {
            row.push(' ');
            row.push(render_cell(board, x, y, reveal_all));
        }
        out.push_str(&row);
        out.push('\n');
    }
    out
}

/// Render a probability heatmap for unknown cells, with a legend.
pub fn render_probabilities(
    board: &Board,
    probabilities: &HashMap<(usize, usize), f64>,
) -> String {
    let mut out = String::new();
    write_header(&mut out, board.width());

    for y in 0..board.height() {
        let mut row = format!("{y:2}");
        for x in 0..board.width() {
            row.push(' ');
            row.push(match board.get_state(x, y) {
                CellState::Revealed => ' ',
                CellState::Flagged => 'F',
                CellState::Unknown => {
                    prob_symbol(probabilities.get(&(x, y)).copied().unwrap_or(0.0))
                }
            });
        }
        out.push_str(&row);
        out.push('\n');
    }

    out.push_str(
        "legend: . (~0%)  - (<15%)  = (<25%)  + (<45%)  # (<75%)  @ (<95%)  * (~100%)\n",
    );
    out
}

fn write_header(out: &mut String, width: usize) {
    let _ = write!(out, "  ");
    for x in 0..width {
        let _ = write!(out, " {}", x % 10);
    }
    out.push('\n');
}

fn render_cell(board: &Board, x: usize, y: usize, reveal_all: bool) -> char {
    match board.get_state(x, y) {
        CellState::Flagged => 'F',
        CellState::Unknown => {
            if reveal_all && board.is_mine(x, y) {
                '*'
            } else {
                '.'
            }
        }
        CellState::Revealed => {
            if board.is_mine(x, y) {
                return '*';
            }
            match board.get_count(x, y) {
                Some(0) | None => ' ',
                Some(n) => (b'0' + n as u8) as char,
            }
        }
    }
}

fn prob_symbol(p: f64) -> char {
    if p < 0.001 {
        '.'
    } else if p < 0.15 {
        '-'
    } else if p < 0.25 {
        '='
    } else if p < 0.45 {
        '+'
    } else if p < 0.75 {
        '#'
    } else if p < 0.95 {
        '@'
    } else {
        '*'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_flags_numbers_and_unknowns() {
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(1, 1);
        board.flag(0, 0);

        let text = render(&board, false);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows[0], "   0 1 2");
        assert_eq!(rows[1], " 0 F . .");
        assert_eq!(rows[2], " 1 . 1 .");
        assert_eq!(rows[3], " 2 . . .");
    }

    #[test]
    fn reveal_all_exposes_mines() {
        let board = Board::with_mines(2, 1, &[(1, 0)]);
        let text = render(&board, true);
        assert!(text.lines().nth(1).unwrap().contains('*'));
    }

    #[test]
    fn lost_board_shows_the_opened_mine() {
        let mut board = Board::with_mines(2, 1, &[(1, 0)]);
        board.open(1, 0);
        let text = render(&board, false);
        assert_eq!(text.lines().nth(1).unwrap(), " 0 . *");
    }

    #[test]
    fn probability_symbols_cover_the_scale() {
        assert_eq!(prob_symbol(0.0), '.');
        assert_eq!(prob_symbol(0.1), '-');
        assert_eq!(prob_symbol(0.2), '=');
        assert_eq!(prob_symbol(0.3), '+');
        assert_eq!(prob_symbol(0.5), '#');
        assert_eq!(prob_symbol(0.9), '@');
        assert_eq!(prob_symbol(1.0), '*');
    }

    #[test]
    fn heatmap_marks_revealed_and_flagged_cells() {
        let mut board = Board::with_mines(3, 1, &[(0, 0)]);
        board.flag(0, 0);
        board.open(1, 0);

        let probabilities = HashMap::from([((2, 0), 0.5)]);
        let text = render_probabilities(&board, &probabilities);
        assert_eq!(text.lines().nth(1).unwrap(), " 0 F   #");
        assert!(text.contains("legend:"));
    }
}
