//! Frontier extraction: unknown-cell indexing, constraints from revealed
//! numbers, and decomposition into independent components.
//!
//! Every unknown cell on the board gets a dense local index in row-major
//! order; constraint scopes are bitmasks over those indices. Since the
//! index space covers all unknowns it routinely exceeds 64, so masks are
//! segmented into `u64` words.

use std::collections::{BTreeSet, HashMap};

use crate::board::Board;
use crate::dsu::Dsu;
use crate::types::CellState;

const WORD_BITS: usize = 64;

/// Bitmask over local unknown indices, in 64-bit segments.
///
/// Trailing zero words are trimmed so that equal masks are structurally
/// equal regardless of how they were built.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeMask {
    words: Vec<u64>,
}

impl ScopeMask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_indices(indices: &[usize]) -> Self {
        let mut mask = Self::new();
        for &idx in indices {
            mask.set(idx);
        }
        mask
    }

    pub fn set(&mut self, idx: usize) {
        let word = idx / WORD_BITS;
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        self.words[word] |= 1 << (idx % WORD_BITS);
    }

    pub fn test(&self, idx: usize) -> bool {
        self.words
            .get(idx / WORD_BITS)
            .is_some_and(|w| w & (1 << (idx % WORD_BITS)) != 0)
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether the two masks share at least one bit.
    pub fn intersects(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(&other.words)
            .any(|(a, b)| a & b != 0)
    }

    /// Whether every bit of `self` is also set in `other`.
    pub fn is_subset(&self, other: &Self) -> bool {
        if self.words.len() > other.words.len() {
            return false;
        }
        self.words
            .iter()
            .zip(&other.words)
            .all(|(a, b)| a & !b == 0)
    }

    /// Bits of `self` that are not in `other`.
    pub fn and_not(&self, other: &Self) -> Self {
        let words = self
            .words
            .iter()
            .enumerate()
            .map(|(i, a)| a & !other.words.get(i).copied().unwrap_or(0))
            .collect();
        let mut mask = Self { words };
        mask.trim();
        mask
    }

    /// OR the bits of `other` into `self`.
    pub fn union_with(&mut self, other: &Self) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        for (i, b) in other.words.iter().enumerate() {
            self.words[i] |= b;
        }
    }

    /// Set bit indices in ascending order.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(wi, &word)| {
            let mut w = word;
            std::iter::from_fn(move || {
                if w == 0 {
                    return None;
                }
                let bit = w.trailing_zeros() as usize;
                w &= w - 1;
                Some(wi * WORD_BITS + bit)
            })
        })
    }

    /// Coordinates of the set bits, resolved against the unknowns list.
    pub fn to_cells(&self, unknowns: &[(usize, usize)]) -> BTreeSet<(usize, usize)> {
        self.iter_ones()
            .filter_map(|idx| unknowns.get(idx).copied())
            .collect()
    }

    fn trim(&mut self) {
        while self.words.last() == Some(&0) {
            self.words.pop();
        }
    }
}

impl std::fmt::Debug for ScopeMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter_ones()).finish()
    }
}

/// A linear constraint derived from one revealed numbered cell: the sum
/// of the 0/1 mine variables in `scope` equals `remaining`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    /// The revealed cell this constraint came from (diagnostics only).
    pub origin: (usize, usize),
    pub scope: ScopeMask,
    /// Cell count minus flagged neighbors. Negative or larger than the
    /// scope only on an inconsistent board.
    pub remaining: i32,
}

impl Constraint {
    /// A constraint a legal mine layout can satisfy.
    pub fn is_consistent(&self) -> bool {
        self.remaining >= 0 && self.remaining as usize <= self.scope.count_ones()
    }
}

/// One maximal group of constraints connected by shared variables.
#[derive(Clone, Debug)]
pub struct Component {
    pub constraints: Vec<Constraint>,
    /// Local indices of the component's variables, ascending.
    pub unknowns: Vec<usize>,
}

/// The constraint system induced by the current board state.
pub struct Frontier {
    /// All unknown cells in row-major (y, x) order; position is the
    /// local index.
    pub unknowns: Vec<(usize, usize)>,
    pub unknown_to_idx: HashMap<(usize, usize), usize>,
    pub constraints: Vec<Constraint>,
}

impl Frontier {
    /// Extract the frontier from the current board state.
    pub fn new(board: &Board) -> Self {
        let mut unknowns = Vec::new();
        let mut numbered = Vec::new();

        for y in 0..board.height() {
            for x in 0..board.width() {
                match board.get_state(x, y) {
                    CellState::Unknown => unknowns.push((x, y)),
                    CellState::Revealed => {
                        if let Some(count) = board.get_count(x, y) {
                            if count > 0 {
                                numbered.push((x, y, count));
                            }
                        }
                    }
                    CellState::Flagged => {}
                }
            }
        }

        let unknown_to_idx: HashMap<(usize, usize), usize> = unknowns
            .iter()
            .enumerate()
            .map(|(idx, &cell)| (cell, idx))
            .collect();

        let mut constraints = Vec::new();
        for (fx, fy, count) in numbered {
            let mut scope = ScopeMask::new();
            let mut flagged = 0i32;

            for &(nx, ny) in board.neighbor_cache.get(fx, fy) {
                match board.get_state(nx, ny) {
                    CellState::Unknown => scope.set(unknown_to_idx[&(nx, ny)]),
                    CellState::Flagged => flagged += 1,
                    CellState::Revealed => {}
                }
            }

            if !scope.is_empty() {
                constraints.push(Constraint {
                    origin: (fx, fy),
                    scope,
                    remaining: count as i32 - flagged,
                });
            }
        }

        Self {
            unknowns,
            unknown_to_idx,
            constraints,
        }
    }

    /// Group constraints into independent components: two constraints
    /// belong together iff their scopes are transitively connected.
    pub fn components(&self) -> Vec<Component> {
        if self.constraints.is_empty() {
            return Vec::new();
        }

        let mut dsu = Dsu::new(self.constraints.len());
        for i in 0..self.constraints.len() {
            for j in (i + 1)..self.constraints.len() {
                if self.constraints[i].scope.intersects(&self.constraints[j].scope) {
                    dsu.union(i, j);
                }
            }
        }

        dsu.components()
            .into_iter()
            .map(|indices| {
                let constraints: Vec<Constraint> = indices
                    .iter()
                    .map(|&i| self.constraints[i].clone())
                    .collect();
                let mut vars = ScopeMask::new();
                for c in &constraints {
                    vars.union_with(&c.scope);
                }
                Component {
                    unknowns: vars.iter_ones().collect(),
                    constraints,
                }
            })
            .collect()
    }

    /// Coordinates of a mask's set bits.
    pub fn mask_to_cells(&self, mask: &ScopeMask) -> BTreeSet<(usize, usize)> {
        mask.to_cells(&self.unknowns)
    }

    /// Mask with the bits of every known cell in `cells`.
    pub fn cells_to_mask<'a, I>(&self, cells: I) -> ScopeMask
    where
        I: IntoIterator<Item = &'a (usize, usize)>,
    {
        let mut mask = ScopeMask::new();
        for cell in cells {
            if let Some(&idx) = self.unknown_to_idx.get(cell) {
                mask.set(idx);
            }
        }
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_set_test_count() {
        let mut mask = ScopeMask::new();
        assert!(mask.is_empty());
        mask.set(3);
        mask.set(70);
        assert!(mask.test(3));
        assert!(mask.test(70));
        assert!(!mask.test(4));
        assert_eq!(mask.count_ones(), 2);
        assert_eq!(mask.iter_ones().collect::<Vec<_>>(), vec![3, 70]);
    }

    #[test]
    fn mask_subset_and_difference() {
        let a = ScopeMask::from_indices(&[1, 2]);
        let b = ScopeMask::from_indices(&[1, 2, 65, 80]);
        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(a.intersects(&b));

        let diff = b.and_not(&a);
        assert_eq!(diff.iter_ones().collect::<Vec<_>>(), vec![65, 80]);
        assert!(!diff.intersects(&a));
    }

    #[test]
    fn mask_difference_trims_to_canonical_form() {
        let a = ScopeMask::from_indices(&[100]);
        let empty = a.and_not(&a);
        assert_eq!(empty, ScopeMask::new());
        assert!(empty.is_empty());
    }

    #[test]
    fn unknowns_are_indexed_row_major() {
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(1, 1);
        let frontier = Frontier::new(&board);

        assert_eq!(
            frontier.unknowns,
            vec![
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 1),
                (2, 1),
                (0, 2),
                (1, 2),
                (2, 2)
            ]
        );
        for (idx, cell) in frontier.unknowns.iter().enumerate() {
            assert_eq!(frontier.unknown_to_idx[cell], idx);
        }
    }

    #[test]
    fn revealed_numbers_emit_constraints() {
        // Mine in one corner, everything but the mine revealed: each
        // number adjacent to the corner constrains exactly that cell.
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(2, 2);
        let frontier = Frontier::new(&board);

        assert_eq!(frontier.unknowns, vec![(0, 0)]);
        assert_eq!(frontier.constraints.len(), 3);
        for constraint in &frontier.constraints {
            assert_eq!(constraint.remaining, 1);
            assert_eq!(constraint.scope.count_ones(), 1);
            assert!(constraint.is_consistent());
        }
    }

    #[test]
    fn flags_reduce_remaining() {
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(1, 0);
        board.flag(0, 0);
        let frontier = Frontier::new(&board);

        // (1, 0) reads 1 with its mine neighbor flagged.
        let constraint = frontier
            .constraints
            .iter()
            .find(|c| c.origin == (1, 0))
            .unwrap();
        assert_eq!(constraint.remaining, 0);
        assert!(!constraint.scope.is_empty());
    }

    #[test]
    fn disjoint_scopes_make_separate_components() {
        // 7x1 strip with mines at x=1 and x=5; the two revealed numbers
        // at the ends constrain disjoint cells.
        let mut board = Board::with_mines(7, 1, &[(1, 0), (5, 0)]);
        board.open(0, 0);
        board.open(6, 0);
        let frontier = Frontier::new(&board);

        assert_eq!(frontier.constraints.len(), 2);
        let components = frontier.components();
        assert_eq!(components.len(), 2);
        for component in &components {
            assert_eq!(component.constraints.len(), 1);
            assert_eq!(component.unknowns.len(), 1);
        }
    }

    #[test]
    fn overlapping_scopes_merge_into_one_component() {
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(2, 2);
        let frontier = Frontier::new(&board);

        let components = frontier.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].constraints.len(), 3);
        assert_eq!(components[0].unknowns, vec![0]);
    }

    #[test]
    fn mask_cells_roundtrip() {
        let mut board = Board::with_mines(3, 3, &[(0, 0)]);
        board.open(1, 1);
        let frontier = Frontier::new(&board);

        let mask = frontier.constraints[0].scope.clone();
        let cells = frontier.mask_to_cells(&mask);
        assert_eq!(frontier.cells_to_mask(&cells), mask);
    }

    #[test]
    fn zero_cells_emit_no_constraints() {
        let mut board = Board::with_mines(5, 5, &[(0, 0)]);
        board.open(4, 4);
        let frontier = Frontier::new(&board);

        for constraint in &frontier.constraints {
            let (ox, oy) = constraint.origin;
            assert!(board.get_count(ox, oy).unwrap() > 0);
        }
    }
}
