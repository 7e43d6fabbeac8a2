//! Constraint-based Minesweeper engine.
//!
//! The solver reduces a partially revealed board to linear constraints
//! over 0/1 mine variables, splits them into independent components via
//! union-find, applies SINGLE/SUBSET inference for certain moves, and
//! enumerates small components exactly for per-cell mine probabilities
//! (cached by a canonical component signature). On top of that sit an
//! auto-play loop with lowest-risk guessing, JSON snapshots, and ASCII
//! rendering for the CLI.

pub mod board;
pub mod dsu;
pub mod enumerate;
pub mod frontier;
pub mod lru;
pub mod pq;
pub mod render;
pub mod rng;
pub mod rules;
pub mod signature;
pub mod snapshot;
pub mod solver;
pub mod types;
