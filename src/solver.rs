//! Solver orchestration: certain moves from the rules, exact
//! probabilities from enumeration, and the auto-play loop.
//!
//! Every invocation rebuilds the frontier from the board; the only state
//! carried across calls is the signature-keyed enumeration cache.

use std::collections::{BTreeSet, HashMap};

use crate::board::Board;
use crate::enumerate::{enumerate_component, Enumeration};
use crate::frontier::{Component, Frontier};
use crate::lru::LruCache;
use crate::pq::MinHeap;
use crate::rules::{find_certain_moves, Move, Rule};
use crate::signature::{component_signature, Signature};
use crate::types::{CellState, GameState};

/// Probability margin below which an enumerated cell counts as certain.
pub const EXACT_EPSILON: f64 = 1e-3;

/// Tunable solver parameters.
#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    /// Largest component (in variables) that gets exact enumeration.
    pub k_max: usize,
    /// Capacity of the signature cache.
    pub cache_size: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            k_max: 20,
            cache_size: 100,
        }
    }
}

pub struct Solver {
    k_max: usize,
    cache: LruCache<Signature, Enumeration>,
    cache_hits: u64,
}

impl Solver {
    pub fn new() -> Self {
        Self::with_config(SolverConfig::default())
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self {
            k_max: config.k_max,
            cache: LruCache::new(config.cache_size),
            cache_hits: 0,
        }
    }

    /// Number of enumeration requests answered from the signature cache.
    pub fn cache_hits(&self) -> u64 {
        self.cache_hits
    }

    /// One certain safe/mine move, or `None` when only guessing remains.
    pub fn get_hint(&mut self, board: &Board) -> Option<Move> {
        self.hint_with_notes(board).0
    }

    /// The next certain move together with the cells to apply it to.
    /// The caller applies it to the board.
    pub fn step(&mut self, board: &Board) -> Option<(Move, BTreeSet<(usize, usize)>)> {
        let hint = self.get_hint(board)?;
        let cells = hint.cells.clone();
        Some((hint, cells))
    }

    /// Mine probability for every unknown cell.
    ///
    /// Components within `k_max` are enumerated exactly (0.5 per
    /// variable when inconsistent); larger ones fall back to the global
    /// base rate. Unknowns outside every constraint get the residual
    /// rate, omitted entirely when no unflagged unknowns remain.
    pub fn compute_probabilities(&mut self, board: &Board) -> HashMap<(usize, usize), f64> {
        let frontier = Frontier::new(board);
        let mut probabilities = HashMap::new();
        if frontier.unknowns.is_empty() {
            return probabilities;
        }

        for component in frontier.components() {
            if component.unknowns.len() <= self.k_max {
                let result = self.enumerate_cached(&component);
                for &idx in &component.unknowns {
                    let p = result.probabilities.get(&idx).copied().unwrap_or(0.5);
                    probabilities.insert(frontier.unknowns[idx], p);
                }
            } else {
                let base =
                    board.num_mines() as f64 / (board.width() * board.height()) as f64;
                for &idx in &component.unknowns {
                    probabilities.insert(frontier.unknowns[idx], base);
                }
            }
        }

        // Residual rate for unknowns no constraint mentions.
        let unknown_nonflagged = frontier.unknowns.len();
        if unknown_nonflagged > 0 {
            let remaining_mines = board.num_mines() as i64 - board.flag_count() as i64;
            let residual =
                (remaining_mines as f64 / unknown_nonflagged as f64).clamp(0.0, 1.0);
            for &cell in &frontier.unknowns {
                probabilities.entry(cell).or_insert(residual);
            }
        }

        probabilities
    }

    /// Play the board until it is decided, the solver is stuck, or
    /// `limit` steps have been taken. Returns the step count and a log.
    pub fn auto_solve(
        &mut self,
        board: &mut Board,
        allow_guess: bool,
        limit: usize,
    ) -> (usize, Vec<String>) {
        let mut steps = 0;
        let mut log = Vec::new();

        while steps < limit && board.game_state() == GameState::Playing {
            let (hint, notes) = self.hint_with_notes(board);
            log.extend(notes);

            match hint {
                Some(hint_move) => {
                    steps += 1;
                    for &(x, y) in &hint_move.cells {
                        if hint_move.is_mine {
                            if board.get_state(x, y) == CellState::Unknown {
                                board.flag(x, y);
                                log.push(format!(
                                    "step {steps}: flagged ({x}, {y}) [{}]",
                                    hint_move.rule
                                ));
                            }
                        } else {
                            let (success, _) = board.open(x, y);
                            if !success {
                                log.push(format!(
                                    "step {steps}: opened ({x}, {y}) and hit a mine"
                                ));
                                return (steps, log);
                            }
                            log.push(format!(
                                "step {steps}: opened ({x}, {y}) [{}]",
                                hint_move.rule
                            ));
                        }
                    }
                }
                None if allow_guess => match self.select_best_guess(board) {
                    Some((x, y)) => {
                        let p = self
                            .compute_probabilities(board)
                            .get(&(x, y))
                            .copied()
                            .unwrap_or(0.5);
                        steps += 1;
                        let (success, _) = board.open(x, y);
                        if !success {
                            log.push(format!(
                                "step {steps}: guessed ({x}, {y}) (p={p:.2}) and hit a mine"
                            ));
                            return (steps, log);
                        }
                        log.push(format!("step {steps}: guessed ({x}, {y}) (p={p:.2})"));
                    }
                    None => {
                        log.push("no moves or guesses available".to_string());
                        break;
                    }
                },
                None => {
                    log.push("stuck: no certain moves, guessing disabled".to_string());
                    break;
                }
            }
        }

        match board.game_state() {
            GameState::Won => log.push(format!("won in {steps} steps")),
            GameState::Lost => log.push(format!("lost at step {steps}")),
            GameState::Playing => {
                if steps >= limit {
                    log.push(format!("reached step limit {limit}"));
                }
            }
        }
        (steps, log)
    }

    /// Lowest-risk unknown cell to open when no certain move exists.
    ///
    /// Minimizes (probability, squared distance to center, x, y). With
    /// no probabilities at all (fresh board), the first unknown cell in
    /// row-major order bootstraps the game.
    pub fn select_best_guess(&mut self, board: &Board) -> Option<(usize, usize)> {
        let probabilities = self.compute_probabilities(board);
        if probabilities.is_empty() {
            for y in 0..board.height() {
                for x in 0..board.width() {
                    if board.get_state(x, y) == CellState::Unknown {
                        return Some((x, y));
                    }
                }
            }
            return None;
        }

        let center_x = board.width() as f64 / 2.0;
        let center_y = board.height() as f64 / 2.0;
        let mut heap = MinHeap::new();
        for (&(x, y), &probability) in &probabilities {
            if board.get_state(x, y) != CellState::Unknown {
                continue;
            }
            let dist2 = (x as f64 - center_x).powi(2) + (y as f64 - center_y).powi(2);
            heap.push(GuessCandidate {
                probability,
                dist2,
                x,
                y,
            });
        }
        heap.pop().map(|c| (c.x, c.y))
    }

    fn hint_with_notes(&mut self, board: &Board) -> (Option<Move>, Vec<String>) {
        let mut notes = Vec::new();
        let frontier = Frontier::new(board);
        if frontier.constraints.is_empty() {
            return (None, notes);
        }

        for component in frontier.components() {
            if !component.constraints.iter().all(|c| c.is_consistent()) {
                notes.push(inconsistency_note(&component));
                continue;
            }

            let moves = find_certain_moves(&component.constraints, &frontier.unknowns);
            if let Some(first) = moves.into_iter().next() {
                return (Some(first), notes);
            }

            if component.unknowns.len() <= self.k_max {
                let result = self.enumerate_cached(&component);
                if result.total_solutions == 0 {
                    notes.push(inconsistency_note(&component));
                    continue;
                }
                for &idx in &component.unknowns {
                    let p = result.probabilities.get(&idx).copied().unwrap_or(0.5);
                    if p <= EXACT_EPSILON {
                        let cell = frontier.unknowns[idx];
                        return (Some(exact_move(cell, false, p)), notes);
                    }
                }
                for &idx in &component.unknowns {
                    let p = result.probabilities.get(&idx).copied().unwrap_or(0.5);
                    if p >= 1.0 - EXACT_EPSILON {
                        let cell = frontier.unknowns[idx];
                        return (Some(exact_move(cell, true, p)), notes);
                    }
                }
            }
        }
        (None, notes)
    }

    fn enumerate_cached(&mut self, component: &Component) -> Enumeration {
        let signature = component_signature(&component.constraints);
        if let Some(cached) = self.cache.get(&signature) {
            self.cache_hits += 1;
            return cached.clone();
        }
        let result = enumerate_component(&component.constraints, &component.unknowns);
        self.cache.put(signature, result.clone());
        result
    }
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

fn exact_move(cell: (usize, usize), is_mine: bool, probability: f64) -> Move {
    let (x, y) = cell;
    Move {
        cells: BTreeSet::from([cell]),
        is_mine,
        rule: Rule::Exact,
        explanation: format!(
            "EXACT at ({x}, {y}): probability {probability:.3} from enumeration"
        ),
    }
}

fn inconsistency_note(component: &Component) -> String {
    let origins: Vec<String> = component
        .constraints
        .iter()
        .map(|c| format!("({}, {})", c.origin.0, c.origin.1))
        .collect();
    format!("inconsistent component at {}", origins.join(", "))
}

/// Guess ranked by (probability, distance to center, x, y), all
/// ascending.
#[derive(Debug)]
struct GuessCandidate {
    probability: f64,
    dist2: f64,
    x: usize,
    y: usize,
}

impl Ord for GuessCandidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.probability
            .total_cmp(&other.probability)
            .then(self.dist2.total_cmp(&other.dist2))
            .then(self.x.cmp(&other.x))
            .then(self.y.cmp(&other.y))
    }
}

impl PartialOrd for GuessCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GuessCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for GuessCandidate {}
